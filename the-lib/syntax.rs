//! Line-oriented, rule-based syntax highlighting.
//!
//! The module is split the same way the work is split at runtime:
//!
//! - **Rules** (`syntax::rules`): an ordered table of `(pattern, scope)` pairs
//!   compiled once. Every rule is matched against the whole line and paints
//!   every match, so a later rule repaints characters an earlier rule styled.
//! - **Block comments** (`syntax::block_comment`): the only construct that
//!   spans lines. It consumes the state carried in from the previous block and
//!   produces the state for the next one.
//! - **Cache** (`syntax::highlight_cache`): the per-block results for one
//!   document and the downstream propagation when a block's outgoing state
//!   changes.
//!
//! [`Highlighter::highlight_block`] is a pure function of the line text and the
//! incoming [`BlockState`].
//!
//! # Example
//!
//! ```
//! use the_lib::syntax::{
//!   BlockState,
//!   Highlighter,
//!   Scope,
//! };
//!
//! let highlighter = Highlighter::cpp().unwrap();
//! let block = highlighter.highlight_block("/* start", BlockState::Normal);
//! assert_eq!(block.state(), BlockState::InBlockComment);
//! assert!(
//!   block
//!     .spans()
//!     .iter()
//!     .any(|span| span.scope == Scope::BlockComment && span.start == 0 && span.len == 8)
//! );
//! ```
pub mod block_comment;
pub mod highlight_cache;
pub mod rules;

use std::{
  fmt,
  ops,
  sync::Arc,
};

pub use block_comment::BlockCommentTokens;
pub use highlight_cache::HighlightCache;
pub use rules::{
  RuleSpec,
  RuleTable,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyntaxError {
  #[error("invalid highlight rule {pattern:?}: {source}")]
  InvalidPattern {
    pattern: String,
    #[source]
    source:  Box<fancy_regex::Error>,
  },
}

pub type Result<T> = std::result::Result<T, SyntaxError>;

/// What a span of text is, independent of how a theme colors it.
///
/// Variants are listed in rule-table precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
  Keyword,
  Operator,
  String,
  Number,
  Function,
  Include,
  FunctionDefinition,
  Class,
  Parameter,
  Type,
  Namespace,
  TemplateParameter,
  Comment,
  BlockComment,
}

impl Scope {
  pub const ALL: [Scope; 14] = [
    Scope::Keyword,
    Scope::Operator,
    Scope::String,
    Scope::Number,
    Scope::Function,
    Scope::Include,
    Scope::FunctionDefinition,
    Scope::Class,
    Scope::Parameter,
    Scope::Type,
    Scope::Namespace,
    Scope::TemplateParameter,
    Scope::Comment,
    Scope::BlockComment,
  ];

  /// Theme key for this scope. Dotted keys fall back to their parent.
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Keyword => "keyword",
      Self::Operator => "operator",
      Self::String => "string",
      Self::Number => "constant.numeric",
      Self::Function => "function",
      Self::Include => "string.include",
      Self::FunctionDefinition => "function.definition",
      Self::Class => "type.class",
      Self::Parameter => "variable.parameter",
      Self::Type => "type",
      Self::Namespace => "namespace",
      Self::TemplateParameter => "type.template",
      Self::Comment => "comment",
      Self::BlockComment => "comment.block",
    }
  }
}

impl fmt::Display for Scope {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// State carried from one block to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockState {
  #[default]
  Normal,
  InBlockComment,
}

impl BlockState {
  /// Decode the opaque per-block integer a host stores. Anything that is not
  /// `1` (including the `-1` "never highlighted" marker) is [`Self::Normal`].
  pub const fn from_int(value: i32) -> Self {
    match value {
      1 => Self::InBlockComment,
      _ => Self::Normal,
    }
  }

  pub const fn to_int(self) -> i32 {
    match self {
      Self::Normal => 0,
      Self::InBlockComment => 1,
    }
  }
}

/// A styled run of chars within one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
  /// Char offset from the start of the block.
  pub start: usize,
  /// Length in chars.
  pub len:   usize,
  pub scope: Scope,
}

impl Span {
  pub const fn new(start: usize, len: usize, scope: Scope) -> Self {
    Self { start, len, scope }
  }

  pub const fn end(&self) -> usize {
    self.start + self.len
  }

  pub const fn range(&self) -> ops::Range<usize> {
    self.start..self.end()
  }
}

/// The highlighting output for one block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockHighlight {
  spans: Vec<Span>,
  state: BlockState,
}

impl BlockHighlight {
  pub fn new(spans: Vec<Span>, state: BlockState) -> Self {
    Self { spans, state }
  }

  /// Spans in the order they were painted: rule spans first, in rule-table
  /// order, then block-comment spans.
  pub fn spans(&self) -> &[Span] {
    &self.spans
  }

  /// State handed to the next block.
  pub fn state(&self) -> BlockState {
    self.state
  }

  /// Flatten the painted spans into non-overlapping runs where the last paint
  /// of each char wins. Unstyled chars are omitted.
  pub fn resolve(&self) -> Vec<(ops::Range<usize>, Scope)> {
    let len = self.spans.iter().map(Span::end).max().unwrap_or(0);
    let mut painted: Vec<Option<Scope>> = vec![None; len];
    for span in &self.spans {
      painted[span.range()].fill(Some(span.scope));
    }

    let mut runs: Vec<(ops::Range<usize>, Scope)> = Vec::new();
    for (idx, scope) in painted.into_iter().enumerate() {
      let Some(scope) = scope else {
        continue;
      };
      match runs.last_mut() {
        Some((range, last)) if range.end == idx && *last == scope => range.end += 1,
        _ => runs.push((idx..idx + 1, scope)),
      }
    }
    runs
  }

  /// Scope that ends up on char `idx` after all paints.
  pub fn scope_at(&self, idx: usize) -> Option<Scope> {
    self
      .spans
      .iter()
      .rev()
      .find(|span| span.range().contains(&idx))
      .map(|span| span.scope)
  }
}

/// Converts byte ranges of a line into char-offset spans.
pub(crate) struct LineText<'a> {
  text:  &'a str,
  ascii: bool,
}

impl<'a> LineText<'a> {
  pub(crate) fn new(text: &'a str) -> Self {
    Self {
      text,
      ascii: text.is_ascii(),
    }
  }

  pub(crate) fn as_str(&self) -> &'a str {
    self.text
  }

  pub(crate) fn char_idx(&self, byte: usize) -> usize {
    if self.ascii {
      byte
    } else {
      self.text[..byte].chars().count()
    }
  }

  pub(crate) fn span(&self, bytes: ops::Range<usize>, scope: Scope) -> Span {
    let start = self.char_idx(bytes.start);
    let end = self.char_idx(bytes.end);
    Span::new(start, end - start, scope)
  }
}

/// Highlights single blocks using a shared, immutable [`RuleTable`].
#[derive(Debug, Clone)]
pub struct Highlighter {
  rules:          Arc<RuleTable>,
  block_comments: BlockCommentTokens,
}

impl Highlighter {
  pub fn new(rules: Arc<RuleTable>, block_comments: BlockCommentTokens) -> Self {
    Self {
      rules,
      block_comments,
    }
  }

  /// The C/C++ rule set with `/* */` block comments.
  pub fn cpp() -> Result<Self> {
    Ok(Self::new(
      Arc::new(RuleTable::cpp()?),
      BlockCommentTokens::default(),
    ))
  }

  pub fn rules(&self) -> &RuleTable {
    &self.rules
  }

  /// Highlight one line given the state the previous block ended in.
  pub fn highlight_block(&self, text: &str, previous: BlockState) -> BlockHighlight {
    let line = LineText::new(text);
    let mut spans = Vec::new();

    self.rules.paint(&line, &mut spans);
    let state = self.block_comments.track(&line, previous, &mut spans);

    BlockHighlight::new(spans, state)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn highlighter() -> Highlighter {
    Highlighter::cpp().unwrap()
  }

  fn has_span(block: &BlockHighlight, start: usize, len: usize, scope: Scope) -> bool {
    block.spans().contains(&Span::new(start, len, scope))
  }

  #[test]
  fn declaration_with_initializer() {
    let block = highlighter().highlight_block("  int x = 5;", BlockState::Normal);

    assert!(has_span(&block, 2, 3, Scope::Keyword));
    assert!(has_span(&block, 10, 1, Scope::Number));
    assert!(has_span(&block, 8, 1, Scope::Operator));
    assert!(has_span(&block, 11, 1, Scope::Operator));
    assert_eq!(block.state(), BlockState::Normal);
  }

  #[test]
  fn later_rules_repaint_earlier_ones() {
    // `int` is followed by an identifier and `=`, so the inferred-type rule
    // paints over the keyword.
    let block = highlighter().highlight_block("  int x = 5;", BlockState::Normal);
    assert_eq!(block.scope_at(2), Some(Scope::Type));

    // a keyword directly followed by `(` ends up styled as a call
    let block = highlighter().highlight_block("if(x)", BlockState::Normal);
    assert!(has_span(&block, 0, 2, Scope::Keyword));
    assert!(has_span(&block, 0, 2, Scope::Function));
    assert_eq!(block.scope_at(0), Some(Scope::FunctionDefinition));
  }

  #[test]
  fn unterminated_block_comment() {
    let block = highlighter().highlight_block("/* start", BlockState::Normal);
    let comments: Vec<_> = block
      .spans()
      .iter()
      .filter(|span| span.scope == Scope::BlockComment)
      .collect();

    assert_eq!(comments, [&Span::new(0, 8, Scope::BlockComment)]);
    assert_eq!(block.state(), BlockState::InBlockComment);
  }

  #[test]
  fn block_comment_closes_on_next_line() {
    let block = highlighter().highlight_block("end */", BlockState::InBlockComment);
    assert!(has_span(&block, 0, 6, Scope::BlockComment));
    assert_eq!(block.state(), BlockState::Normal);
    assert_eq!(block.resolve(), vec![(0..6, Scope::BlockComment)]);
  }

  #[test]
  fn line_comment_wins_over_code() {
    let block = highlighter().highlight_block("x = 1; // note", BlockState::Normal);
    assert!(has_span(&block, 7, 7, Scope::Comment));
    assert_eq!(block.scope_at(10), Some(Scope::Comment));
    assert_eq!(block.scope_at(2), Some(Scope::Operator));
  }

  #[test]
  fn preprocessor_include() {
    let block = highlighter().highlight_block("#include <vector>", BlockState::Normal);
    assert!(has_span(&block, 0, 8, Scope::Keyword));
    assert!(has_span(&block, 9, 8, Scope::Include));
    assert_eq!(block.scope_at(12), Some(Scope::Include));
  }

  #[test]
  fn class_and_namespace_declarations() {
    let hl = highlighter();
    let block = hl.highlight_block("class Foo {", BlockState::Normal);
    assert!(has_span(&block, 0, 9, Scope::Class));

    let block = hl.highlight_block("namespace app {", BlockState::Normal);
    assert!(has_span(&block, 0, 13, Scope::Namespace));

    let block = hl.highlight_block("template <typename T>", BlockState::Normal);
    assert!(has_span(&block, 0, 21, Scope::TemplateParameter));
  }

  #[test]
  fn function_definition_parameters() {
    let block = highlighter().highlight_block("void run(Config cfg, int n)", BlockState::Normal);
    // `void ` precedes the identifier that is followed by `(`
    assert!(has_span(&block, 0, 5, Scope::Parameter));
    assert!(has_span(&block, 5, 3, Scope::Function));
    // `Config` is followed by an identifier and `,`
    assert!(has_span(&block, 9, 6, Scope::Type));
    assert_eq!(block.scope_at(9), Some(Scope::Type));
  }

  #[test]
  fn non_ascii_offsets_are_chars() {
    let block = highlighter().highlight_block("é = 1; // ü", BlockState::Normal);
    assert!(has_span(&block, 7, 4, Scope::Comment));
    assert!(has_span(&block, 4, 1, Scope::Number));
  }

  #[test]
  fn resolve_merges_adjacent_runs() {
    let block = BlockHighlight::new(
      vec![
        Span::new(0, 4, Scope::Keyword),
        Span::new(2, 4, Scope::Comment),
        Span::new(8, 1, Scope::Comment),
      ],
      BlockState::Normal,
    );
    assert_eq!(block.resolve(), vec![
      (0..2, Scope::Keyword),
      (2..6, Scope::Comment),
      (8..9, Scope::Comment),
    ]);
  }

  #[test]
  fn block_state_int_roundtrip() {
    assert_eq!(BlockState::from_int(-1), BlockState::Normal);
    assert_eq!(BlockState::from_int(1), BlockState::InBlockComment);
    assert_eq!(BlockState::InBlockComment.to_int(), 1);
    assert_eq!(BlockState::Normal.to_int(), 0);
  }

  quickcheck::quickcheck! {
    fn highlight_block_is_deterministic(text: String, in_comment: bool) -> bool {
      let text: String = text.chars().filter(|ch| *ch != '\n' && *ch != '\r').collect();
      let previous = if in_comment {
        BlockState::InBlockComment
      } else {
        BlockState::Normal
      };
      let hl = highlighter();
      hl.highlight_block(&text, previous) == hl.highlight_block(&text, previous)
    }

    fn spans_stay_inside_the_line(text: String) -> bool {
      let text: String = text.chars().filter(|ch| *ch != '\n' && *ch != '\r').collect();
      let len = text.chars().count();
      highlighter()
        .highlight_block(&text, BlockState::Normal)
        .spans()
        .iter()
        .all(|span| span.end() <= len)
    }
  }
}
