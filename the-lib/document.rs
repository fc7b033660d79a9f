//! Document buffer state.
//!
//! A [`Document`] owns the text, the caret, and a version counter. It is the
//! "buffer organized into blocks" the highlighter and the editing engine
//! share: each line of the rope is one block. Highlight state per block is
//! kept outside, in [`crate::syntax::HighlightCache`], so the document stays a
//! plain buffer.
//!
//! # Example
//!
//! ```
//! use ropey::Rope;
//! use the_lib::{
//!   document::Document,
//!   transaction::Transaction,
//! };
//!
//! let mut doc = Document::new(Rope::from("hello"));
//! let tx = Transaction::change(doc.text(), [(5, 5, Some(" world".into()))]).unwrap();
//! doc.apply_transaction(&tx).unwrap();
//! assert_eq!(doc.text(), "hello world");
//! ```

use std::borrow::Cow;

use ropey::Rope;
use the_core::line_ending::{
  LineEnding,
  NATIVE_LINE_ENDING,
  auto_detect_line_ending,
  line_without_line_ending,
};
use thiserror::Error;

use crate::{
  Tendril,
  selection::Range,
  transaction::{
    Transaction,
    TransactionError,
  },
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DocumentFlags {
  pub readonly: bool,
  pub modified: bool,
}

#[derive(Debug, Error)]
pub enum DocumentError {
  #[error("document is readonly")]
  Readonly,
  #[error(transparent)]
  Transaction(#[from] TransactionError),
}

pub type Result<T> = std::result::Result<T, DocumentError>;

/// Lines touched by an applied edit, in block indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineEdit {
  /// First block whose text may have changed.
  pub start:   usize,
  /// Last affected block before the edit.
  pub old_end: usize,
  /// Last affected block after the edit.
  pub new_end: usize,
}

#[derive(Debug, Clone)]
pub struct Document {
  display_name: Tendril,
  text:         Rope,
  selection:    Range,
  line_ending:  LineEnding,
  version:      u64,
  flags:        DocumentFlags,
}

impl Default for Document {
  fn default() -> Self {
    Self::new(Rope::new())
  }
}

impl Document {
  pub fn new(text: Rope) -> Self {
    let line_ending = auto_detect_line_ending(&text).unwrap_or(NATIVE_LINE_ENDING);
    Self {
      display_name: Tendril::new(),
      text,
      selection: Range::point(0),
      line_ending,
      version: 0,
      flags: DocumentFlags::default(),
    }
  }

  pub fn display_name(&self) -> Cow<'_, str> {
    if self.display_name.is_empty() {
      Cow::Borrowed("<untitled>")
    } else {
      Cow::Borrowed(self.display_name.as_str())
    }
  }

  pub fn set_display_name(&mut self, name: impl Into<Tendril>) {
    self.display_name = name.into();
  }

  pub fn text(&self) -> &Rope {
    &self.text
  }

  /// Number of blocks. An empty document still has one (empty) block.
  pub fn len_blocks(&self) -> usize {
    self.text.len_lines()
  }

  /// Text of block `idx` without its line ending. Out-of-range blocks read as
  /// empty.
  pub fn block_text(&self, idx: usize) -> Cow<'_, str> {
    if idx >= self.len_blocks() {
      return Cow::Borrowed("");
    }
    let slice = self.text.slice(..);
    line_without_line_ending(&slice, idx).into()
  }

  /// Char index where block `idx` starts, clamped to the document end.
  pub fn block_start(&self, idx: usize) -> usize {
    if idx >= self.len_blocks() {
      return self.text.len_chars();
    }
    self.text.line_to_char(idx)
  }

  pub fn selection(&self) -> Range {
    self.selection
  }

  /// Install a selection, clamping it into the buffer.
  pub fn set_selection(&mut self, selection: Range) {
    self.selection = selection.clamp(self.text.len_chars());
  }

  pub fn caret(&self) -> usize {
    self.selection.head
  }

  /// Collapse the selection onto `pos`, clamped to the buffer bounds.
  pub fn set_caret(&mut self, pos: usize) {
    self.set_selection(Range::point(pos));
  }

  pub fn cursor_line(&self) -> usize {
    self.selection.cursor_line(self.text.slice(..))
  }

  pub fn line_ending(&self) -> LineEnding {
    self.line_ending
  }

  pub fn version(&self) -> u64 {
    self.version
  }

  pub fn flags(&self) -> DocumentFlags {
    self.flags
  }

  pub fn set_readonly(&mut self, readonly: bool) {
    self.flags.readonly = readonly;
  }

  /// Apply `transaction` and move the selection. Returns the blocks whose text
  /// changed, or `None` when the transaction was empty.
  pub fn apply_transaction(&mut self, transaction: &Transaction) -> Result<Option<LineEdit>> {
    if self.flags.readonly {
      return Err(DocumentError::Readonly);
    }

    let old = self.text.clone();
    transaction.apply(&mut self.text)?;

    let selection = match transaction.selection() {
      Some(selection) => *selection,
      None => self.selection.map(transaction),
    };
    self.set_selection(selection);

    let Some((start, old_end, new_end)) = transaction.line_span(&old, &self.text) else {
      return Ok(None);
    };

    self.flags.modified = true;
    self.version = self.version.saturating_add(1);

    Ok(Some(LineEdit {
      start,
      old_end,
      new_end,
    }))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn blocks_exclude_line_endings() {
    let doc = Document::new(Rope::from("int a;\r\n// b\n"));
    assert_eq!(doc.len_blocks(), 3);
    assert_eq!(doc.block_text(0), "int a;");
    assert_eq!(doc.block_text(1), "// b");
    assert_eq!(doc.block_text(2), "");
    assert_eq!(doc.block_text(9), "");
    assert_eq!(doc.line_ending(), LineEnding::Crlf);
  }

  #[test]
  fn caret_is_clamped() {
    let mut doc = Document::new(Rope::from("abc"));
    doc.set_caret(42);
    assert_eq!(doc.caret(), 3);
    doc.set_selection(Range::new(10, 1));
    assert_eq!(doc.selection(), Range::new(3, 1));
  }

  #[test]
  fn apply_reports_touched_lines() {
    let mut doc = Document::new(Rope::from("a\nb\nc"));
    doc.set_caret(3);
    let tx = Transaction::change(doc.text(), [(3, 3, Some("\nx".into()))]).unwrap();
    let edit = doc.apply_transaction(&tx).unwrap();

    assert_eq!(doc.text(), "a\nb\nx\nc");
    assert_eq!(edit, Some(LineEdit {
      start:   1,
      old_end: 1,
      new_end: 2,
    }));
    assert_eq!(doc.caret(), 5);
    assert_eq!(doc.version(), 1);
    assert!(doc.flags().modified);
  }

  #[test]
  fn readonly_rejects_edits() {
    let mut doc = Document::new(Rope::from("abc"));
    doc.set_readonly(true);
    let tx = Transaction::change(doc.text(), [(0, 1, None)]).unwrap();
    assert!(matches!(
      doc.apply_transaction(&tx),
      Err(DocumentError::Readonly)
    ));
    assert_eq!(doc.text(), "abc");
  }

  #[test]
  fn transaction_selection_overrides_mapping() {
    let mut doc = Document::new(Rope::from("abc"));
    doc.set_caret(1);
    let tx = Transaction::change(doc.text(), [(2, 2, Some("x".into()))])
      .unwrap()
      .with_selection(Range::point(0));
    doc.apply_transaction(&tx).unwrap();
    assert_eq!(doc.selection(), Range::point(0));
  }
}
