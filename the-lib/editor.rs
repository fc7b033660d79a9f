//! The editing surface: one document plus everything that reacts to it.
//!
//! [`Editor::handle_event`] is the single entry point for input. Each key
//! event runs in three steps: the suggestion popup gets first pick of
//! confirm/cancel/navigation keys, then structural handling (newline indent
//! copy, tab, comment toggle, ordinary editing), then exactly one completion
//! refresh. Every edit goes through a [`Transaction`] and the highlight cache
//! is brought up to date before the call returns.
//!
//! # Example
//!
//! ```
//! use the_lib::{
//!   config::Config,
//!   editor::Editor,
//!   input::{
//!     InputEvent,
//!     Key,
//!     KeyEvent,
//!   },
//! };
//!
//! let mut editor = Editor::new(&Config::default()).unwrap();
//! for ch in "vo".chars() {
//!   editor
//!     .handle_event(InputEvent::Key(KeyEvent::plain(Key::Char(ch))))
//!     .unwrap();
//! }
//! assert_eq!(editor.completion().items(), ["void", "volatile"]);
//! ```

use std::ops;

use ropey::Rope;
use the_core::{
  line_ending::line_without_line_ending,
  rope::RopeSliceExt,
};
use thiserror::Error;

use crate::{
  comment::{
    self,
    DEFAULT_COMMENT_TOKEN,
  },
  completion::{
    self,
    Completion,
  },
  config::Config,
  document::{
    Document,
    DocumentError,
  },
  indent,
  input::{
    EventResult,
    InputEvent,
    Key,
    KeyEvent,
    ScrollEvent,
  },
  movement::{
    self,
    Direction,
  },
  render::{
    LinePlan,
    MenuPlan,
    RenderPlan,
    Theme,
  },
  selection::Range,
  syntax::{
    BlockHighlight,
    HighlightCache,
    Highlighter,
    SyntaxError,
  },
  transaction::{
    Transaction,
    TransactionError,
  },
  view::ViewState,
};

#[derive(Debug, Error)]
pub enum EditorError {
  #[error(transparent)]
  Syntax(#[from] SyntaxError),
  #[error(transparent)]
  Document(#[from] DocumentError),
  #[error(transparent)]
  Transaction(#[from] TransactionError),
}

pub type Result<T> = std::result::Result<T, EditorError>;

#[derive(Debug)]
pub struct Editor {
  document:    Document,
  highlighter: Highlighter,
  highlights:  HighlightCache,
  completion:  Completion,
  view:        ViewState,
  theme:       Theme,
  cursorline:  bool,
  /// Set whenever something visible changed; cleared by the host.
  redraw:      bool,
}

impl Editor {
  /// An editor over an empty document.
  pub fn new(config: &Config) -> Result<Self> {
    Self::with_text(config, Rope::new())
  }

  /// An editor over `text`, highlighted from the top. The rule table is
  /// compiled here, once.
  pub fn with_text(config: &Config, text: Rope) -> Result<Self> {
    let highlighter = Highlighter::cpp()?;
    let document = Document::new(text);
    let highlights = HighlightCache::new(&document, &highlighter);

    Ok(Self {
      document,
      highlighter,
      highlights,
      completion: Completion::new(
        config.completion.candidates(),
        usize::from(config.completion.scrollbar_width),
      ),
      view: ViewState::new(config.font_size),
      theme: config.theme(),
      cursorline: config.cursorline,
      redraw: true,
    })
  }

  pub fn document(&self) -> &Document {
    &self.document
  }

  /// Rename the document shown to the user.
  pub fn set_display_name(&mut self, name: &str) {
    self.document.set_display_name(name);
    self.redraw = true;
  }

  pub fn completion(&self) -> &Completion {
    &self.completion
  }

  pub fn view(&self) -> &ViewState {
    &self.view
  }

  pub fn view_mut(&mut self) -> &mut ViewState {
    &mut self.view
  }

  pub fn theme(&self) -> &Theme {
    &self.theme
  }

  pub fn highlighter(&self) -> &Highlighter {
    &self.highlighter
  }

  pub fn highlight(&self, block: usize) -> Option<&BlockHighlight> {
    self.highlights.block(block)
  }

  pub fn cursor_line(&self) -> usize {
    self.document.cursor_line()
  }

  /// Move the caret, clamped into the buffer. The popup is left alone.
  pub fn set_caret(&mut self, pos: usize) {
    self.document.set_caret(pos);
    self.redraw = true;
  }

  /// Whether a redraw was requested since the last call.
  pub fn take_redraw(&mut self) -> bool {
    std::mem::take(&mut self.redraw)
  }

  pub fn handle_event(&mut self, event: InputEvent) -> Result<EventResult> {
    tracing::trace!(?event, "handle event");
    match event {
      InputEvent::Key(key) => self.handle_key(key),
      InputEvent::Scroll(scroll) => Ok(self.handle_scroll(scroll)),
      InputEvent::Paste(text) => {
        self.insert_text(&text)?;
        self.refresh_completion(!text.is_empty());
        Ok(EventResult::Consumed)
      },
    }
  }

  fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult> {
    if self.completion.is_visible() {
      if let Some(result) = self.handle_popup_key(key)? {
        self.redraw = true;
        return Ok(result);
      }
    }

    let result = match key.key {
      Key::Enter | Key::NumpadEnter => {
        let tx = indent::insert_newline(
          self.document.text(),
          self.document.selection(),
          self.document.line_ending(),
        )?;
        self.apply(&tx)?;
        EventResult::Consumed
      },
      Key::Tab => {
        let tx = indent::insert_tab(self.document.text(), self.document.selection())?;
        self.apply(&tx)?;
        EventResult::Consumed
      },
      Key::Char('/') if key.modifiers.ctrl() => {
        self.toggle_line_comment()?;
        EventResult::Consumed
      },
      Key::Char(_) => {
        match key.text() {
          Some(ch) => {
            let mut buf = [0; 4];
            self.insert_text(ch.encode_utf8(&mut buf))?;
            EventResult::Consumed
          },
          None => EventResult::Ignored,
        }
      },
      Key::Backspace => {
        self.delete(Direction::Backward)?;
        EventResult::Consumed
      },
      Key::Delete => {
        self.delete(Direction::Forward)?;
        EventResult::Consumed
      },
      Key::Left | Key::Right | Key::Up | Key::Down | Key::Home | Key::End => {
        self.move_caret(key.key);
        EventResult::Consumed
      },
      Key::Escape | Key::Backtab | Key::Other => EventResult::Ignored,
    };

    self.refresh_completion(key.text().is_some());
    Ok(result)
  }

  /// Keys the popup owns while it is visible. `None` lets the key through.
  fn handle_popup_key(&mut self, key: KeyEvent) -> Result<Option<EventResult>> {
    match key.key {
      Key::Enter | Key::NumpadEnter | Key::Tab => {
        match self.completion.selected_item().map(str::to_owned) {
          Some(candidate) => self.confirm_completion(&candidate)?,
          None => self.completion.hide(),
        }
      },
      Key::Escape | Key::Backtab => self.completion.hide(),
      Key::Up => self.completion.move_up(),
      Key::Down => self.completion.move_down(),
      _ => return Ok(None),
    }
    Ok(Some(EventResult::Consumed))
  }

  fn handle_scroll(&mut self, scroll: ScrollEvent) -> EventResult {
    if !scroll.modifiers.ctrl() {
      return EventResult::Ignored;
    }
    let step = if scroll.delta > 0 { 1 } else { -1 };
    let size = self.view.zoom(step);
    tracing::debug!(size, "zoom");
    self.redraw = true;
    EventResult::Consumed
  }

  /// Comment or uncomment the caret's line, then rehighlight it.
  pub fn toggle_line_comment(&mut self) -> Result<()> {
    let line = self.cursor_line();
    let tx = comment::toggle_line_comment(self.document.text(), line, DEFAULT_COMMENT_TOKEN)?;
    self.apply(&tx)?;
    self.rehighlight(line);
    Ok(())
  }

  /// Replace the active prefix before the caret with `candidate` and close
  /// the popup.
  pub fn confirm_completion(&mut self, candidate: &str) -> Result<()> {
    let prefix_len = self.completion.prefix().chars().count();
    let tx = completion::confirm(
      self.document.text(),
      self.document.caret(),
      prefix_len,
      candidate,
    )?;
    self.apply(&tx)?;
    self.completion.hide();
    Ok(())
  }

  /// Recompute block `block` (clamped) and whatever follows it whose
  /// incoming state changed.
  pub fn rehighlight(&mut self, block: usize) -> ops::Range<usize> {
    let refreshed = self
      .highlights
      .rehighlight(&self.document, &self.highlighter, block);
    tracing::debug!(?refreshed, "forced rehighlight");
    self.redraw = true;
    refreshed
  }

  /// Show the popup for the word under the caret, or hide it. Runs once at
  /// the end of every key event.
  fn refresh_completion(&mut self, typed: bool) {
    let was_visible = self.completion.is_visible();
    if !typed {
      self.completion.hide();
      self.redraw |= was_visible;
      return;
    }

    let text = self.document.text();
    let caret = self.document.caret();
    let line = text.char_to_line(caret);
    let column = caret - text.line_to_char(line);
    let slice = text.slice(..);
    let content = line_without_line_ending(&slice, line);
    let word: String = content.slice(content.word_range_at(column)).into();

    self.completion.refresh(&word, line, column);
    self.redraw |= was_visible || self.completion.is_visible();
  }

  fn insert_text(&mut self, text: &str) -> Result<()> {
    let tx = Transaction::replace(self.document.text(), self.document.selection(), text)?;
    self.apply(&tx)
  }

  fn delete(&mut self, dir: Direction) -> Result<()> {
    let selection = self.document.selection();
    let range = if selection.is_empty() {
      let other = movement::move_horizontally(self.document.text().slice(..), selection.head, dir);
      Range::new(selection.head, other)
    } else {
      selection
    };
    if range.is_empty() {
      return Ok(());
    }
    let tx = Transaction::replace(self.document.text(), range, "")?;
    self.apply(&tx)
  }

  fn move_caret(&mut self, key: Key) {
    let text = self.document.text().slice(..);
    let caret = self.document.caret();
    let pos = match key {
      Key::Left => movement::move_horizontally(text, caret, Direction::Backward),
      Key::Right => movement::move_horizontally(text, caret, Direction::Forward),
      Key::Up => movement::move_vertically(text, caret, Direction::Backward),
      Key::Down => movement::move_vertically(text, caret, Direction::Forward),
      Key::Home => movement::line_start(text, caret),
      Key::End => movement::line_end(text, caret),
      _ => caret,
    };
    self.set_caret(pos);
  }

  fn apply(&mut self, tx: &Transaction) -> Result<()> {
    if let Some(edit) = self.document.apply_transaction(tx)? {
      let refreshed = self
        .highlights
        .apply_edit(&self.document, &self.highlighter, edit);
      tracing::trace!(?edit, ?refreshed, "applied edit");
    }
    self.redraw = true;
    Ok(())
  }

  /// Styled runs for one block, or `None` past the end of the document.
  pub fn render_line(&self, block: usize) -> Option<LinePlan> {
    let highlight = self.highlights.block(block)?;
    let cursorline = self.cursorline && block == self.cursor_line();
    Some(LinePlan::build(
      block,
      &self.document.block_text(block),
      highlight,
      &self.theme,
      cursorline,
    ))
  }

  /// Everything a host needs to draw `blocks` (clamped to the document).
  pub fn render_plan(&self, blocks: ops::Range<usize>) -> RenderPlan {
    let end = blocks.end.min(self.document.len_blocks());
    let lines = (blocks.start.min(end)..end)
      .filter_map(|block| self.render_line(block))
      .collect();

    let caret = self.document.caret();
    let line = self.cursor_line();
    let column = caret - self.document.block_start(line);

    RenderPlan {
      lines,
      cursor: (line, column),
      menu: MenuPlan::build(&self.completion, &self.theme),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    input::Modifiers,
    syntax::{
      BlockState,
      Scope,
    },
  };

  fn editor(text: &str) -> Editor {
    let mut editor = Editor::with_text(&Config::default(), Rope::from(text)).unwrap();
    editor.set_caret(text.chars().count());
    editor
  }

  fn key(editor: &mut Editor, key: Key) -> EventResult {
    editor
      .handle_event(InputEvent::Key(KeyEvent::plain(key)))
      .unwrap()
  }

  fn ctrl(editor: &mut Editor, key: Key) -> EventResult {
    editor
      .handle_event(InputEvent::Key(KeyEvent::ctrl(key)))
      .unwrap()
  }

  fn type_str(editor: &mut Editor, text: &str) {
    for ch in text.chars() {
      key(editor, Key::Char(ch));
    }
  }

  fn text(editor: &Editor) -> String {
    editor.document().text().to_string()
  }

  fn assert_cache_consistent(editor: &Editor) {
    let fresh = HighlightCache::new(editor.document(), editor.highlighter());
    for block in 0..editor.document().len_blocks() {
      assert_eq!(editor.highlight(block), fresh.block(block), "block {block}");
    }
  }

  #[test]
  fn newline_copies_indentation() {
    let mut editor = editor("    foo();");
    key(&mut editor, Key::Enter);

    assert_eq!(text(&editor), "    foo();\n    ");
    assert_eq!(editor.document().caret(), 15);
    assert_eq!(editor.cursor_line(), 1);
  }

  #[test]
  fn tab_inserts_two_spaces() {
    let mut editor = editor("x");
    editor.set_caret(0);
    key(&mut editor, Key::Tab);
    assert_eq!(text(&editor), "  x");
  }

  #[test]
  fn ctrl_slash_toggles_current_line() {
    let mut editor = editor("a\nx = 1; // note\nb");
    editor.set_caret(4);

    assert_eq!(ctrl(&mut editor, Key::Char('/')), EventResult::Consumed);
    assert_eq!(text(&editor), "a\n// x = 1; // note\nb");
    assert_eq!(editor.document().caret(), 7);
    assert_eq!(
      editor.highlight(1).unwrap().resolve(),
      vec![(0..17, Scope::Comment)]
    );

    editor.toggle_line_comment().unwrap();
    assert_eq!(text(&editor), "a\nx = 1; // note\nb");
    assert!(!editor.completion().is_visible());
  }

  #[test]
  fn typing_shows_and_filters_completion() {
    let mut editor = editor("");
    type_str(&mut editor, "vo");

    let completion = editor.completion();
    assert!(completion.is_visible());
    assert_eq!(completion.prefix(), "vo");
    assert_eq!(completion.items(), ["void", "volatile"]);
    assert_eq!(completion.placement().column, 2);

    type_str(&mut editor, "l");
    assert_eq!(editor.completion().selected_item(), Some("volatile"));

    type_str(&mut editor, " ");
    assert!(!editor.completion().is_visible());
  }

  #[test]
  fn popup_keys_are_consumed() {
    let mut editor = editor("  ");
    type_str(&mut editor, "vo");

    key(&mut editor, Key::Down);
    assert_eq!(editor.completion().selected_item(), Some("void"));
    assert_eq!(text(&editor), "  vo");

    key(&mut editor, Key::Enter);
    assert_eq!(text(&editor), "  void");
    assert_eq!(editor.document().caret(), 6);
    assert!(!editor.completion().is_visible());
  }

  #[test]
  fn confirm_without_selection_only_hides() {
    let mut editor = editor("");
    type_str(&mut editor, "s");
    assert!(editor.completion().is_visible());

    key(&mut editor, Key::Tab);
    assert_eq!(text(&editor), "s");
    assert!(!editor.completion().is_visible());

    // the popup is gone, so tab is structural again
    key(&mut editor, Key::Tab);
    assert_eq!(text(&editor), "s  ");
  }

  #[test]
  fn escape_and_backtab_hide() {
    for dismiss in [Key::Escape, Key::Backtab] {
      let mut editor = editor("");
      type_str(&mut editor, "wh");
      assert_eq!(key(&mut editor, dismiss), EventResult::Consumed);
      assert!(!editor.completion().is_visible());
      assert_eq!(text(&editor), "wh");
    }
  }

  #[test]
  fn non_typing_keys_hide_popup() {
    let mut editor = editor("");
    type_str(&mut editor, "in");
    key(&mut editor, Key::Left);
    assert!(!editor.completion().is_visible());
    assert_eq!(editor.document().caret(), 1);
  }

  #[test]
  fn confirm_completion_replaces_prefix() {
    let mut editor = editor("");
    type_str(&mut editor, "vo");
    editor.confirm_completion("void").unwrap();

    assert_eq!(text(&editor), "void");
    assert_eq!(editor.document().caret(), 4);
    assert!(!editor.completion().is_visible());
  }

  #[test]
  fn confirm_uses_the_whole_word_as_prefix_length() {
    let mut editor = editor("a\nid");
    editor.set_caret(2);
    type_str(&mut editor, "vo");
    assert_eq!(editor.completion().prefix(), "void");
    assert_eq!(editor.completion().selected_item(), Some("void"));

    key(&mut editor, Key::Enter);
    assert_eq!(text(&editor), "voidid");
    assert_eq!(editor.document().caret(), 4);
  }

  #[test]
  fn ctrl_scroll_zooms_and_clamps() {
    let mut editor = Editor::new(&Config {
      font_size: 2,
      ..Config::default()
    })
    .unwrap();
    let zoom = |delta| {
      InputEvent::Scroll(ScrollEvent {
        delta,
        modifiers: Modifiers::from_bits(Modifiers::CTRL),
      })
    };

    editor.handle_event(zoom(1)).unwrap();
    assert_eq!(editor.view().font_size(), 3);
    for _ in 0..5 {
      editor.handle_event(zoom(-1)).unwrap();
    }
    assert_eq!(editor.view().font_size(), 1);

    let plain = InputEvent::Scroll(ScrollEvent {
      delta:     1,
      modifiers: Modifiers::empty(),
    });
    assert_eq!(editor.handle_event(plain).unwrap(), EventResult::Ignored);
    assert_eq!(editor.view().font_size(), 1);
  }

  #[test]
  fn opening_comment_propagates_downstream() {
    let mut editor = editor("int a;\nint b;\nint c;");
    editor.set_caret(0);
    type_str(&mut editor, "/*");

    for block in 0..3 {
      assert_eq!(
        editor.highlight(block).unwrap().state(),
        BlockState::InBlockComment
      );
    }
    assert_cache_consistent(&editor);

    editor.set_caret(20);
    type_str(&mut editor, "*/");
    assert_eq!(editor.highlight(2).unwrap().state(), BlockState::Normal);
    assert_cache_consistent(&editor);
  }

  #[test]
  fn editing_keys() {
    let mut editor = editor("ab\r\ncd");
    key(&mut editor, Key::Home);
    assert_eq!(editor.document().caret(), 4);
    key(&mut editor, Key::Backspace);
    assert_eq!(text(&editor), "abcd");
    assert_eq!(editor.document().caret(), 2);

    key(&mut editor, Key::Delete);
    assert_eq!(text(&editor), "abd");
    key(&mut editor, Key::End);
    key(&mut editor, Key::Right);
    assert_eq!(editor.document().caret(), 3);
    assert_cache_consistent(&editor);
  }

  #[test]
  fn paste_inserts_text() {
    let mut editor = editor("x");
    editor
      .handle_event(InputEvent::Paste("\n/* y".into()))
      .unwrap();
    assert_eq!(text(&editor), "x\n/* y");
    assert_eq!(editor.highlight(1).unwrap().state(), BlockState::InBlockComment);
  }

  #[test]
  fn render_plan_marks_cursor_line() {
    let mut editor = editor("int a;\nint b;");
    editor.set_caret(8);

    let plan = editor.render_plan(0..10);
    assert_eq!(plan.lines.len(), 2);
    assert!(!plan.lines[0].cursorline);
    assert!(plan.lines[1].cursorline);
    assert_eq!(plan.cursor, (1, 1));
    assert!(plan.menu.is_none());
    assert!(editor.render_line(2).is_none());
  }

  #[test]
  fn rehighlight_clamps_block() {
    let mut editor = editor("a\nb");
    assert_eq!(editor.rehighlight(42), 1..2);
    assert!(editor.take_redraw());
    assert!(!editor.take_redraw());
  }

  #[test]
  fn hiding_the_popup_requests_redraw() {
    let mut editor = editor("");
    editor
      .handle_event(InputEvent::Key(KeyEvent::plain(Key::Char('w'))))
      .unwrap();
    assert!(editor.completion().is_visible());
    editor.take_redraw();

    let result = editor
      .handle_event(InputEvent::Key(KeyEvent::plain(Key::Other)))
      .unwrap();
    assert_eq!(result, EventResult::Ignored);
    assert!(!editor.completion().is_visible());
    assert!(editor.take_redraw());
  }

  #[test]
  fn readonly_document_reports_error() {
    let mut editor = editor("x");
    editor.document.set_readonly(true);
    let err = editor
      .handle_event(InputEvent::Key(KeyEvent::plain(Key::Char('y'))))
      .unwrap_err();
    assert!(matches!(err, EditorError::Document(DocumentError::Readonly)));
  }
}
