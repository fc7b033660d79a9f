//! Block comment tracking across lines.
//!
//! Comment starts do not nest. When a line begins inside a comment, scanning
//! still restarts at column 0 and a start token on that line opens a fresh
//! comment rather than being ignored.

use super::{
  BlockState,
  LineText,
  Scope,
  Span,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockCommentTokens {
  pub start: String,
  pub end:   String,
}

impl Default for BlockCommentTokens {
  fn default() -> Self {
    Self {
      start: "/*".to_string(),
      end:   "*/".to_string(),
    }
  }
}

impl BlockCommentTokens {
  /// Append the block comment spans of `line` and return the state the line
  /// ends in.
  ///
  /// The end token is searched from the start token's own offset, so `/*/`
  /// closes on itself.
  pub(crate) fn track(
    &self,
    line: &LineText<'_>,
    previous: BlockState,
    spans: &mut Vec<Span>,
  ) -> BlockState {
    if self.start.is_empty() || self.end.is_empty() {
      return BlockState::Normal;
    }

    let text = line.as_str();
    let mut state = BlockState::Normal;

    let mut start = match previous {
      BlockState::InBlockComment => Some(0),
      BlockState::Normal => text.find(self.start.as_str()),
    };

    while let Some(from) = start {
      let end = match text[from..].find(self.end.as_str()) {
        Some(offset) => from + offset + self.end.len(),
        None => {
          state = BlockState::InBlockComment;
          text.len()
        },
      };

      if from < end {
        spans.push(line.span(from..end, Scope::BlockComment));
      }

      start = text[end..]
        .find(self.start.as_str())
        .map(|offset| end + offset);
    }

    state
  }
}
