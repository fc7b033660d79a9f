//! Extension methods for [`RopeSlice`].

use std::ops::Range;

use ropey::RopeSlice;

use crate::chars::{
  char_is_whitespace,
  char_is_word,
};

pub trait RopeSliceExt<'a>: Sized {
  /// Char index of the first character that is not indentation whitespace.
  fn first_non_whitespace_char(self) -> Option<usize>;

  /// The leading whitespace run of the slice.
  fn leading_whitespace(self) -> RopeSlice<'a>;

  fn starts_with(self, text: &str) -> bool;

  /// The maximal run of word characters touching `char_idx`.
  ///
  /// A run that ends exactly at `char_idx` or starts exactly at it counts as
  /// touching, so a caret right after `foo` reports `foo`. Returns an empty
  /// range at `char_idx` when neither neighbour is a word character.
  fn word_range_at(self, char_idx: usize) -> Range<usize>;
}

impl<'a> RopeSliceExt<'a> for RopeSlice<'a> {
  fn first_non_whitespace_char(self) -> Option<usize> {
    self.chars().position(|ch| !char_is_whitespace(ch))
  }

  fn leading_whitespace(self) -> RopeSlice<'a> {
    let end = self
      .chars()
      .take_while(|&ch| char_is_whitespace(ch))
      .count();
    self.slice(..end)
  }

  fn starts_with(self, text: &str) -> bool {
    let mut chars = self.chars();
    text.chars().all(|ch| chars.next() == Some(ch))
  }

  fn word_range_at(self, char_idx: usize) -> Range<usize> {
    let char_idx = char_idx.min(self.len_chars());

    let mut start = char_idx;
    while start > 0 && char_is_word(self.char(start - 1)) {
      start -= 1;
    }

    let mut end = char_idx;
    while end < self.len_chars() && char_is_word(self.char(end)) {
      end += 1;
    }

    start..end
  }
}

#[cfg(test)]
mod tests {
  use ropey::Rope;

  use super::*;

  #[test]
  fn first_non_whitespace() {
    let text = Rope::from("  \tfoo");
    assert_eq!(text.slice(..).first_non_whitespace_char(), Some(3));
    assert_eq!(Rope::from("   ").slice(..).first_non_whitespace_char(), None);
    assert_eq!(text.slice(..).leading_whitespace(), "  \t");
  }

  #[test]
  fn starts_with_handles_short_slices() {
    let text = Rope::from("/");
    assert!(!text.slice(..).starts_with("//"));
    assert!(Rope::from("// x").slice(..).starts_with("//"));
  }

  #[test]
  fn word_range_touching_caret() {
    let text = Rope::from("int vo;");
    let slice = text.slice(..);

    assert_eq!(slice.word_range_at(6), 4..6);
    assert_eq!(slice.word_range_at(4), 4..6);
    assert_eq!(slice.word_range_at(5), 4..6);
    assert_eq!(slice.word_range_at(3), 0..3);
    assert_eq!(slice.word_range_at(7), 7..7);
    assert_eq!(slice.word_range_at(100), 7..7);
  }

  quickcheck::quickcheck! {
    fn word_range_contains_caret(text: String, idx: usize) -> bool {
      let rope = Rope::from(text.as_str());
      let slice = rope.slice(..);
      let idx = idx % (slice.len_chars() + 1);
      let range = slice.word_range_at(idx);
      range.start <= idx && idx <= range.end
        && slice.slice(range).chars().all(char_is_word)
    }
  }
}
