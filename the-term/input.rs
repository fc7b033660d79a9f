//! Input translation - maps crossterm events to editor input events.

use crossterm::event::{
  Event,
  KeyCode,
  KeyEvent as CrosstermKeyEvent,
  KeyEventKind,
  KeyEventState,
  KeyModifiers,
  MouseEvent,
  MouseEventKind,
};
use the_lib::input::{
  InputEvent,
  Key,
  KeyEvent,
  Modifiers,
  ScrollEvent,
};

/// `None` for events the editor has no use for (focus, releases, clicks).
pub fn to_input_event(event: Event) -> Option<InputEvent> {
  match event {
    Event::Key(key) => to_key_event(key).map(InputEvent::from),
    Event::Mouse(mouse) => to_scroll_event(mouse).map(InputEvent::from),
    Event::Paste(text) => Some(InputEvent::Paste(text.into())),
    _ => None,
  }
}

/// Ctrl+Q leaves the host; the editor never sees it.
pub fn is_quit(event: &Event) -> bool {
  matches!(
    event,
    Event::Key(CrosstermKeyEvent {
      code: KeyCode::Char('q'),
      modifiers,
      kind: KeyEventKind::Press,
      ..
    }) if modifiers.contains(KeyModifiers::CONTROL)
  )
}

fn to_key_event(event: CrosstermKeyEvent) -> Option<KeyEvent> {
  if event.kind == KeyEventKind::Release {
    return None;
  }
  let key = match event.code {
    // Without keyboard enhancement, Ctrl+/ arrives as 0x1F, which crossterm
    // decodes as Ctrl+7 (or Ctrl+_ on some terminals).
    KeyCode::Char('7' | '_') if event.modifiers.contains(KeyModifiers::CONTROL) => Key::Char('/'),
    KeyCode::Char(c) => Key::Char(c),
    KeyCode::Enter if event.state.contains(KeyEventState::KEYPAD) => Key::NumpadEnter,
    KeyCode::Enter => Key::Enter,
    KeyCode::Tab => Key::Tab,
    KeyCode::BackTab => Key::Backtab,
    KeyCode::Esc => Key::Escape,
    KeyCode::Backspace => Key::Backspace,
    KeyCode::Delete => Key::Delete,
    KeyCode::Home => Key::Home,
    KeyCode::End => Key::End,
    KeyCode::Left => Key::Left,
    KeyCode::Right => Key::Right,
    KeyCode::Up => Key::Up,
    KeyCode::Down => Key::Down,
    _ => Key::Other,
  };
  Some(KeyEvent::new(key, to_modifiers(event.modifiers)))
}

fn to_scroll_event(event: MouseEvent) -> Option<ScrollEvent> {
  let delta = match event.kind {
    MouseEventKind::ScrollUp => 1,
    MouseEventKind::ScrollDown => -1,
    _ => return None,
  };
  Some(ScrollEvent {
    delta,
    modifiers: to_modifiers(event.modifiers),
  })
}

fn to_modifiers(modifiers: KeyModifiers) -> Modifiers {
  let mut out = Modifiers::empty();
  if modifiers.contains(KeyModifiers::CONTROL) {
    out.insert(Modifiers::CTRL);
  }
  if modifiers.contains(KeyModifiers::ALT) {
    out.insert(Modifiers::ALT);
  }
  if modifiers.contains(KeyModifiers::SHIFT) {
    out.insert(Modifiers::SHIFT);
  }
  out
}
