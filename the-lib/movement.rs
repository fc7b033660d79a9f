//! Caret movement over a rope.
//!
//! Positions are char indices. A CRLF pair is stepped over as one unit so the
//! caret never lands between `\r` and `\n`. Every function clamps its input.
//!
//! # Usage
//!
//! ```
//! use ropey::Rope;
//! use the_lib::movement::{
//!   Direction,
//!   move_horizontally,
//!   move_vertically,
//! };
//!
//! let text = Rope::from("ab\r\ncd");
//! assert_eq!(move_horizontally(text.slice(..), 2, Direction::Forward), 4);
//! assert_eq!(move_vertically(text.slice(..), 1, Direction::Forward), 5);
//! ```

use ropey::RopeSlice;
use the_core::line_ending::line_end_char_index;

/// The direction of caret movement.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
  /// Toward the end of the document.
  Forward,
  /// Toward the start of the document.
  Backward,
}

fn is_crlf_at(text: RopeSlice, pos: usize) -> bool {
  text.get_char(pos) == Some('\r') && text.get_char(pos + 1) == Some('\n')
}

/// One char over, or two across a CRLF pair.
pub fn move_horizontally(text: RopeSlice, pos: usize, dir: Direction) -> usize {
  let pos = pos.min(text.len_chars());
  match dir {
    Direction::Forward if pos >= text.len_chars() => pos,
    Direction::Forward if is_crlf_at(text, pos) => pos + 2,
    Direction::Forward => pos + 1,
    Direction::Backward if pos == 0 => 0,
    Direction::Backward if pos >= 2 && is_crlf_at(text, pos - 2) => pos - 2,
    Direction::Backward => pos - 1,
  }
}

/// Same column on the neighbouring line, clamped to that line's end. Stays
/// put on the first or last line.
pub fn move_vertically(text: RopeSlice, pos: usize, dir: Direction) -> usize {
  let pos = pos.min(text.len_chars());
  let line = text.char_to_line(pos);
  let column = pos - text.line_to_char(line);

  let target = match dir {
    Direction::Forward if line + 1 < text.len_lines() => line + 1,
    Direction::Backward if line > 0 => line - 1,
    _ => return pos,
  };

  let start = text.line_to_char(target);
  let end = line_end_char_index(&text, target);
  (start + column).min(end)
}

/// Start of the line `pos` is on.
pub fn line_start(text: RopeSlice, pos: usize) -> usize {
  let pos = pos.min(text.len_chars());
  text.line_to_char(text.char_to_line(pos))
}

/// End of the line `pos` is on, before its line ending.
pub fn line_end(text: RopeSlice, pos: usize) -> usize {
  let pos = pos.min(text.len_chars());
  line_end_char_index(&text, text.char_to_line(pos))
}
