//! Line comment toggling.
//!
//! A line counts as commented when its first non-whitespace characters are
//! the comment token. Commenting inserts the token and one space at that
//! column; uncommenting removes the token and at most one following space.
//!
//! # Example
//!
//! ```
//! use ropey::Rope;
//! use the_lib::comment::toggle_line_comment;
//!
//! let mut doc = Rope::from("  x = 1;");
//! let tx = toggle_line_comment(&doc, 0, "//").unwrap();
//! tx.apply(&mut doc).unwrap();
//! assert_eq!(doc, "  // x = 1;");
//! ```

use ropey::{
  Rope,
  RopeSlice,
};
use the_core::{
  line_ending::line_without_line_ending,
  rope::RopeSliceExt,
};

use crate::{
  Tendril,
  transaction::{
    Result,
    Transaction,
  },
};

pub const DEFAULT_COMMENT_TOKEN: &str = "//";

/// Column of the comment token on `line`, if the line is commented.
pub fn find_line_comment(line: RopeSlice, token: &str) -> Option<usize> {
  let pos = line.first_non_whitespace_char()?;
  line.slice(pos..).starts_with(token).then_some(pos)
}

/// Build the transaction that comments or uncomments line `line` of `text`.
/// Lines past the end are clamped to the last line.
pub fn toggle_line_comment(text: &Rope, line: usize, token: &str) -> Result<Transaction> {
  let line = line.min(text.len_lines().saturating_sub(1));
  let slice = text.slice(..);
  let content = line_without_line_ending(&slice, line);
  let line_start = text.line_to_char(line);

  let change = match find_line_comment(content, token) {
    Some(pos) => {
      let token_end = pos + token.chars().count();
      let margin = usize::from(content.get_char(token_end) == Some(' '));
      (line_start + pos, line_start + token_end + margin, None)
    },
    None => {
      // blank lines get the token at their end
      let pos = content
        .first_non_whitespace_char()
        .unwrap_or(content.len_chars());
      let mut inserted = Tendril::from(token);
      inserted.push(' ');
      (line_start + pos, line_start + pos, Some(inserted))
    },
  };

  Transaction::change(text, [change])
}

#[cfg(test)]
mod tests {
  use quickcheck::{
    TestResult,
    quickcheck,
  };
  use the_core::chars::char_is_whitespace;

  use super::*;

  fn toggle(text: &str, line: usize) -> String {
    let mut doc = Rope::from(text);
    toggle_line_comment(&doc, line, DEFAULT_COMMENT_TOKEN)
      .unwrap()
      .apply(&mut doc)
      .unwrap();
    doc.to_string()
  }

  #[test]
  fn comments_at_first_non_whitespace_column() {
    assert_eq!(toggle("    int a;", 0), "    // int a;");
  }

  #[test]
  fn trailing_comment_does_not_count() {
    let commented = toggle("x = 1; // note", 0);
    assert_eq!(commented, "// x = 1; // note");
    assert_eq!(toggle(&commented, 0), "x = 1; // note");
  }

  #[test]
  fn uncomment_removes_exactly_one_space() {
    assert_eq!(toggle("  //   x", 0), "    x");
    assert_eq!(toggle("//x", 0), "x");
  }

  #[test]
  fn only_the_requested_line_changes() {
    assert_eq!(toggle("a\n  b\nc", 1), "a\n  // b\nc");
    assert_eq!(toggle("a\r\n// b\r\nc", 1), "a\r\nb\r\nc");
  }

  #[test]
  fn blank_lines_get_a_marker() {
    assert_eq!(toggle("", 0), "// ");
    assert_eq!(toggle("  \nx", 0), "  // \nx");
  }

  #[test]
  fn line_past_end_is_clamped() {
    assert_eq!(toggle("a\nb", 7), "a\n// b");
  }

  #[test]
  fn finds_commented_column() {
    let doc = Rope::from("\t// x");
    assert_eq!(find_line_comment(doc.slice(..), "//"), Some(1));
    assert_eq!(find_line_comment(Rope::from("x // y").slice(..), "//"), None);
  }

  quickcheck! {
    fn double_toggle_restores_uncommented_line(line: String) -> TestResult {
      let line: String = line.chars().filter(|ch| !matches!(ch, '\n' | '\r')).collect();
      if find_line_comment(Rope::from(line.as_str()).slice(..), DEFAULT_COMMENT_TOKEN).is_some() {
        return TestResult::discard();
      }
      TestResult::from_bool(toggle(&toggle(&line, 0), 0) == line)
    }

    fn double_toggle_restores_canonical_comment(body: String, indent: u8) -> TestResult {
      let body: String = body.chars().filter(|ch| !matches!(ch, '\n' | '\r')).collect();
      if body.starts_with(DEFAULT_COMMENT_TOKEN) || body.starts_with(char_is_whitespace) {
        return TestResult::discard();
      }
      let line = format!("{}// {body}", " ".repeat(usize::from(indent % 8)));
      TestResult::from_bool(toggle(&toggle(&line, 0), 0) == line)
    }
  }
}
