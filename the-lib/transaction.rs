//! Edits applied to a document as a single unit.
//!
//! A [`Transaction`] is an ordered list of non-overlapping [`Change`]s over
//! char indices of the document it was built against, plus an optional
//! selection to install once applied. Every structural edit the editor makes
//! (indent copy, tab, comment toggle, completion confirm) is expressed as one
//! transaction so the caret and the highlighter can be updated from it.
//!
//! # Example
//!
//! ```
//! use ropey::Rope;
//! use the_lib::transaction::Transaction;
//!
//! let mut doc = Rope::from("hello world");
//! let tx = Transaction::change(&doc, [(6, 11, Some("rust".into()))]).unwrap();
//! tx.apply(&mut doc).unwrap();
//! assert_eq!(doc, "hello rust");
//! ```

use ropey::Rope;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
  Tendril,
  selection::Range,
};

/// `(from, to, replacement)`
pub type Change = (usize, usize, Option<Tendril>);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransactionError {
  #[error("transaction length mismatch: expected {expected}, got {actual}")]
  LengthMismatch { expected: usize, actual: usize },
  #[error("invalid change range: start {from} is after end {to}")]
  InvalidRange { from: usize, to: usize },
  #[error("change range {from}..{to} is out of bounds for document length {len}")]
  RangeOutOfBounds {
    from: usize,
    to:   usize,
    len:  usize,
  },
  #[error("change range {from}..{to} overlaps previous end {prev_end}")]
  OverlappingRange {
    prev_end: usize,
    from:     usize,
    to:       usize,
  },
}

pub type Result<T> = std::result::Result<T, TransactionError>;

/// How a position sitting exactly on an edit boundary moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
  /// Stay before text inserted at this position.
  Before,
  /// Move past text inserted at this position.
  After,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
  changes:   SmallVec<[Change; 1]>,
  len:       usize,
  selection: Option<Range>,
}

impl Transaction {
  pub fn change<I>(doc: &Rope, changes: I) -> Result<Self>
  where
    I: IntoIterator<Item = Change>,
  {
    let len = doc.len_chars();
    let mut validated = SmallVec::new();

    let mut last = 0;
    for (from, to, text) in changes {
      if from > to {
        return Err(TransactionError::InvalidRange { from, to });
      }
      if to > len {
        return Err(TransactionError::RangeOutOfBounds { from, to, len });
      }
      if from < last {
        return Err(TransactionError::OverlappingRange {
          prev_end: last,
          from,
          to,
        });
      }
      // no-op changes only add noise to position mapping
      if from == to && text.as_ref().is_none_or(|text| text.is_empty()) {
        continue;
      }
      validated.push((from, to, text));
      last = to;
    }

    Ok(Self {
      changes: validated,
      len,
      selection: None,
    })
  }

  /// Replace `range` with `text` and leave the caret right after it.
  pub fn replace(doc: &Rope, range: Range, text: impl Into<Tendril>) -> Result<Self> {
    let text = text.into();
    let caret = range.from() + text.chars().count();
    Ok(Self::change(doc, [(range.from(), range.to(), Some(text))])?.with_selection(Range::point(caret)))
  }

  #[must_use]
  pub fn with_selection(mut self, selection: Range) -> Self {
    self.selection = Some(selection);
    self
  }

  pub fn selection(&self) -> Option<&Range> {
    self.selection.as_ref()
  }

  pub fn changes(&self) -> &[Change] {
    &self.changes
  }

  pub fn is_empty(&self) -> bool {
    self.changes.is_empty()
  }

  /// Length of the document this transaction was built against.
  pub fn len_before(&self) -> usize {
    self.len
  }

  pub fn apply(&self, doc: &mut Rope) -> Result<()> {
    if doc.len_chars() != self.len {
      return Err(TransactionError::LengthMismatch {
        expected: self.len,
        actual:   doc.len_chars(),
      });
    }

    // back to front so earlier offsets stay valid
    for (from, to, text) in self.changes.iter().rev() {
      if from < to {
        doc.remove(*from..*to);
      }
      if let Some(text) = text {
        doc.insert(*from, text);
      }
    }
    Ok(())
  }

  /// Map a char index of the old document into the new one.
  pub fn map_pos(&self, pos: usize, assoc: Assoc) -> usize {
    let mut delta: isize = 0;

    for (from, to, text) in &self.changes {
      let (from, to) = (*from, *to);
      let inserted = text.as_ref().map_or(0, |text| text.chars().count());

      if pos < from {
        break;
      }

      // inside the replaced range, or on a pure insertion point
      if pos < to || pos == from {
        let base = from.saturating_add_signed(delta);
        return match assoc {
          Assoc::Before => base,
          Assoc::After => base + inserted,
        };
      }

      delta += inserted as isize - (to - from) as isize;
    }

    pos.saturating_add_signed(delta)
  }

  /// Lines touched by this transaction: `(first line, last line before, last
  /// line after)`. `None` for an empty transaction.
  pub fn line_span(&self, old: &Rope, new: &Rope) -> Option<(usize, usize, usize)> {
    let (first_from, _, _) = self.changes.first()?;
    let (last_from, last_to, last_text) = self.changes.last()?;

    let start = old.char_to_line(*first_from);
    let old_end = old.char_to_line(*last_to);
    let new_last = self.map_pos(*last_from, Assoc::Before)
      + last_text.as_ref().map_or(0, |text| text.chars().count());
    let new_end = new.char_to_line(new_last.min(new.len_chars()));

    Some((start, old_end, new_end))
  }
}
