//! Input event types for editor dispatch.
//!
//! Hosts translate their native events into [`InputEvent`] and hand them to
//! [`crate::editor::Editor::handle_event`].

use crate::Tendril;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Modifiers {
  bits: u8,
}

impl Modifiers {
  pub const CTRL: u8 = 0b0000_0001;
  pub const ALT: u8 = 0b0000_0010;
  pub const SHIFT: u8 = 0b0000_0100;

  #[must_use]
  pub const fn empty() -> Self {
    Self { bits: 0 }
  }

  #[must_use]
  pub const fn from_bits(bits: u8) -> Self {
    Self { bits }
  }

  #[must_use]
  pub const fn is_empty(self) -> bool {
    self.bits == 0
  }

  #[must_use]
  pub const fn ctrl(self) -> bool {
    (self.bits & Self::CTRL) != 0
  }

  #[must_use]
  pub const fn alt(self) -> bool {
    (self.bits & Self::ALT) != 0
  }

  #[must_use]
  pub const fn shift(self) -> bool {
    (self.bits & Self::SHIFT) != 0
  }

  pub fn insert(&mut self, bits: u8) {
    self.bits |= bits;
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
  Char(char),
  Enter,
  NumpadEnter,
  Escape,
  Backspace,
  Tab,
  Backtab,
  Delete,
  Home,
  End,
  Left,
  Right,
  Up,
  Down,
  Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
  pub key:       Key,
  pub modifiers: Modifiers,
}

impl KeyEvent {
  pub const fn new(key: Key, modifiers: Modifiers) -> Self {
    Self { key, modifiers }
  }

  pub const fn plain(key: Key) -> Self {
    Self::new(key, Modifiers::empty())
  }

  pub const fn ctrl(key: Key) -> Self {
    Self::new(key, Modifiers::from_bits(Modifiers::CTRL))
  }

  /// The text this key types into the buffer, if any. Chords with Ctrl or
  /// Alt type nothing.
  pub fn text(&self) -> Option<char> {
    match self.key {
      Key::Char(ch) if !self.modifiers.ctrl() && !self.modifiers.alt() => Some(ch),
      _ => None,
    }
  }
}

/// One wheel or trackpad step. Positive `delta` scrolls up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollEvent {
  pub delta:     i32,
  pub modifiers: Modifiers,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
  Key(KeyEvent),
  Scroll(ScrollEvent),
  Paste(Tendril),
}

impl From<KeyEvent> for InputEvent {
  fn from(event: KeyEvent) -> Self {
    Self::Key(event)
  }
}

impl From<ScrollEvent> for InputEvent {
  fn from(event: ScrollEvent) -> Self {
    Self::Scroll(event)
  }
}

/// Whether the editor acted on an event. `Ignored` leaves the host free to
/// run its default behavior, such as scrolling the view.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
  Consumed,
  #[default]
  Ignored,
}

impl EventResult {
  pub fn is_consumed(self) -> bool {
    matches!(self, Self::Consumed)
  }
}
