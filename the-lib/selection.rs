//! The caret and its optional selection.
//!
//! The editing surface works with exactly one cursor. A [`Range`] is an
//! `anchor`/`head` pair of char indices; the head is where the caret is drawn
//! and where insertions happen.

use ropey::RopeSlice;

use crate::transaction::{
  Assoc,
  Transaction,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Range {
  pub anchor: usize,
  pub head:   usize,
}

impl Range {
  pub fn new(anchor: usize, head: usize) -> Self {
    Self { anchor, head }
  }

  #[inline]
  pub fn point(head: usize) -> Self {
    Self::new(head, head)
  }

  /// Start of the range
  #[inline]
  #[must_use]
  pub fn from(&self) -> usize {
    std::cmp::min(self.anchor, self.head)
  }

  /// End of the range
  #[inline]
  #[must_use]
  pub fn to(&self) -> usize {
    std::cmp::max(self.anchor, self.head)
  }

  #[inline]
  #[must_use]
  pub fn len(&self) -> usize {
    self.to() - self.from()
  }

  /// When the head and anchor are in the same position, we have no range.
  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.anchor == self.head
  }

  /// Line the caret sits on.
  pub fn cursor_line(&self, text: RopeSlice) -> usize {
    text.char_to_line(self.head.min(text.len_chars()))
  }

  /// Clamp both ends into `0..=len`.
  #[must_use]
  pub fn clamp(self, len: usize) -> Self {
    Self::new(self.anchor.min(len), self.head.min(len))
  }

  /// Map the range through an edit. The head follows text inserted exactly at
  /// its position, matching how a caret behaves while typing.
  #[must_use]
  pub fn map(self, transaction: &Transaction) -> Self {
    if self.is_empty() {
      return Self::point(transaction.map_pos(self.head, Assoc::After));
    }
    let (anchor_assoc, head_assoc) = if self.anchor < self.head {
      (Assoc::After, Assoc::Before)
    } else {
      (Assoc::Before, Assoc::After)
    };
    Self::new(
      transaction.map_pos(self.anchor, anchor_assoc),
      transaction.map_pos(self.head, head_assoc),
    )
  }
}

impl From<(usize, usize)> for Range {
  fn from((anchor, head): (usize, usize)) -> Self {
    Self::new(anchor, head)
  }
}
