//! Newline and tab insertion.
//!
//! Indentation is copied literally: a new line starts with exactly the
//! leading whitespace of the line the caret was on, whatever that line
//! contains. Tab never inserts a tab character.

use ropey::Rope;
use the_core::{
  line_ending::LineEnding,
  rope::RopeSliceExt,
};

use crate::{
  Tendril,
  selection::Range,
  transaction::{
    Result,
    Transaction,
  },
};

/// What the tab key inserts.
pub const TAB_TEXT: &str = "  ";

/// Leading whitespace of `line`, or empty when out of range.
pub fn indent_for_line(text: &Rope, line: usize) -> Tendril {
  if line >= text.len_lines() {
    return Tendril::new();
  }
  let mut indent = Tendril::new();
  for ch in text.line(line).leading_whitespace().chars() {
    indent.push(ch);
  }
  indent
}

/// Replace `selection` with a line break followed by the indentation of the
/// caret's line. The caret lands after the copied indentation.
pub fn insert_newline(text: &Rope, selection: Range, line_ending: LineEnding) -> Result<Transaction> {
  let line = selection.cursor_line(text.slice(..));
  let mut inserted = Tendril::from(line_ending.as_str());
  inserted.push_str(&indent_for_line(text, line));
  Transaction::replace(text, selection, inserted)
}

/// Replace `selection` with [`TAB_TEXT`].
pub fn insert_tab(text: &Rope, selection: Range) -> Result<Transaction> {
  Transaction::replace(text, selection, TAB_TEXT)
}
