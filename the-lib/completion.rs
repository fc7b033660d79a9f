//! Word completion popup state.
//!
//! The candidate set is fixed once built. Everything else in [`Completion`]
//! is recomputed from the prefix on every refresh, so the popup can never
//! show results for a word the caret has left.
//!
//! # Example
//!
//! ```
//! use the_lib::completion::{
//!   CandidateSet,
//!   Completion,
//! };
//!
//! let mut completion = Completion::new(CandidateSet::cpp(), 1);
//! completion.refresh("VO", 0, 2);
//! assert_eq!(completion.items(), ["void", "volatile"]);
//! assert_eq!(completion.placement().width, "volatile".len() + 1);
//! ```

use std::{
  cmp::Ordering,
  sync::Arc,
};

use ropey::Rope;
use unicode_width::UnicodeWidthStr;

use crate::{
  Tendril,
  selection::Range,
  transaction::{
    Result,
    Transaction,
  },
};

/// Built-in candidates: the C/C++ keywords offered while typing.
pub const DEFAULT_WORDS: &[&str] = &[
  "auto",
  "break",
  "case",
  "char",
  "class",
  "const",
  "continue",
  "default",
  "delete",
  "do",
  "double",
  "else",
  "enum",
  "extern",
  "float",
  "for",
  "goto",
  "if",
  "inline",
  "int",
  "long",
  "namespace",
  "operator",
  "private",
  "protected",
  "public",
  "return",
  "short",
  "signed",
  "sizeof",
  "static",
  "struct",
  "switch",
  "template",
  "this",
  "throw",
  "try",
  "typedef",
  "union",
  "unsigned",
  "virtual",
  "void",
  "volatile",
  "while",
];

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
  a.to_lowercase()
    .cmp(&b.to_lowercase())
    .then_with(|| a.cmp(b))
}

fn starts_with_ignore_case(word: &str, prefix: &str) -> bool {
  word.to_lowercase().starts_with(&prefix.to_lowercase())
}

/// Immutable, case-insensitively sorted word list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSet {
  words: Arc<[String]>,
}

impl CandidateSet {
  pub fn new<I, S>(words: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let mut words: Vec<String> = words.into_iter().map(Into::into).collect();
    words.sort_by(|a, b| cmp_ignore_case(a, b));
    words.dedup();
    Self {
      words: words.into(),
    }
  }

  pub fn cpp() -> Self {
    Self::new(DEFAULT_WORDS.iter().copied())
  }

  pub fn words(&self) -> &[String] {
    &self.words
  }

  pub fn len(&self) -> usize {
    self.words.len()
  }

  pub fn is_empty(&self) -> bool {
    self.words.is_empty()
  }

  /// Candidates starting with `prefix`, ignoring case, in set order.
  pub fn filter(&self, prefix: &str) -> Vec<String> {
    self
      .words
      .iter()
      .filter(|word| starts_with_ignore_case(word, prefix))
      .cloned()
      .collect()
  }
}

impl Default for CandidateSet {
  fn default() -> Self {
    Self::cpp()
  }
}

/// Where the popup is anchored, in document coordinates, and how wide it is
/// in cells.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
  pub line:   usize,
  pub column: usize,
  pub width:  usize,
}

#[derive(Debug, Clone)]
pub struct Completion {
  candidates:      CandidateSet,
  prefix:          Tendril,
  items:           Vec<String>,
  selected:        Option<usize>,
  visible:         bool,
  placement:       Placement,
  scrollbar_width: usize,
}

impl Completion {
  pub fn new(candidates: CandidateSet, scrollbar_width: usize) -> Self {
    Self {
      candidates,
      prefix: Tendril::new(),
      items: Vec::new(),
      selected: None,
      visible: false,
      placement: Placement::default(),
      scrollbar_width,
    }
  }

  pub fn candidates(&self) -> &CandidateSet {
    &self.candidates
  }

  pub fn prefix(&self) -> &str {
    &self.prefix
  }

  pub fn items(&self) -> &[String] {
    &self.items
  }

  pub fn selected(&self) -> Option<usize> {
    self.selected
  }

  pub fn selected_item(&self) -> Option<&str> {
    self.selected.and_then(|idx| self.items.get(idx)).map(String::as_str)
  }

  pub fn is_visible(&self) -> bool {
    self.visible
  }

  pub fn placement(&self) -> Placement {
    self.placement
  }

  /// Recompute the popup for `prefix` anchored at the caret. An empty prefix,
  /// or one nothing matches, hides the popup. A single remaining candidate is
  /// selected.
  pub fn refresh(&mut self, prefix: &str, line: usize, column: usize) {
    if prefix.is_empty() {
      self.hide();
      return;
    }

    self.prefix = prefix.into();
    self.items = self.candidates.filter(prefix);
    if self.items.is_empty() {
      self.visible = false;
      self.selected = None;
      return;
    }

    let longest = self
      .items
      .iter()
      .map(|item| item.width())
      .max()
      .unwrap_or(0);
    self.placement = Placement {
      line,
      column,
      width: longest + self.scrollbar_width,
    };
    self.selected = (self.items.len() == 1).then_some(0);
    self.visible = true;
  }

  pub fn hide(&mut self) {
    self.visible = false;
    self.prefix.clear();
    self.items.clear();
    self.selected = None;
  }

  /// Select the previous item. Stops at the first one; with nothing selected
  /// the last item is picked.
  pub fn move_up(&mut self) {
    if self.items.is_empty() {
      return;
    }
    self.selected = Some(match self.selected {
      Some(idx) => idx.saturating_sub(1),
      None => self.items.len() - 1,
    });
  }

  /// Select the next item. Stops at the last one; with nothing selected the
  /// first item is picked.
  pub fn move_down(&mut self) {
    if self.items.is_empty() {
      return;
    }
    self.selected = Some(match self.selected {
      Some(idx) => (idx + 1).min(self.items.len() - 1),
      None => 0,
    });
  }
}

/// Replace the `prefix_len` chars before `caret` with `candidate`, leaving
/// the caret right after it.
///
/// Only chars before the caret are replaced, even when the prefix was taken
/// from a word that continues past the caret, and the range may reach back
/// over a line break.
pub fn confirm(text: &Rope, caret: usize, prefix_len: usize, candidate: &str) -> Result<Transaction> {
  let caret = caret.min(text.len_chars());
  let from = caret.saturating_sub(prefix_len);
  Transaction::replace(text, Range::new(from, caret), candidate)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn completion() -> Completion {
    Completion::new(CandidateSet::cpp(), 1)
  }

  #[test]
  fn candidates_sorted_ignoring_case() {
    let set = CandidateSet::new(["beta", "Alpha", "alpha", "Gamma", "beta"]);
    assert_eq!(set.words(), ["Alpha", "alpha", "beta", "Gamma"]);
    assert!(CandidateSet::cpp().words().is_sorted_by(|a, b| cmp_ignore_case(a, b).is_le()));
  }

  #[test]
  fn vo_filters_to_void_and_volatile() {
    let mut completion = completion();
    completion.refresh("vo", 3, 6);

    assert!(completion.is_visible());
    assert_eq!(completion.items(), ["void", "volatile"]);
    assert_eq!(completion.selected(), None);
    assert_eq!(completion.placement(), Placement {
      line:   3,
      column: 6,
      width:  9,
    });
  }

  #[test]
  fn single_candidate_is_preselected() {
    let mut completion = completion();
    completion.refresh("vol", 0, 0);
    assert_eq!(completion.selected_item(), Some("volatile"));
  }

  #[test]
  fn empty_or_unmatched_prefix_hides() {
    let mut completion = completion();
    completion.refresh("in", 0, 0);
    assert!(completion.is_visible());

    completion.refresh("", 0, 0);
    assert!(!completion.is_visible());

    completion.refresh("zzz", 0, 0);
    assert!(!completion.is_visible());
    assert_eq!(completion.selected(), None);
  }

  #[test]
  fn refresh_is_idempotent() {
    let mut once = completion();
    once.refresh("s", 1, 2);
    let mut twice = once.clone();
    twice.refresh("s", 1, 2);

    assert_eq!(once.items(), twice.items());
    assert_eq!(once.selected(), twice.selected());
    assert_eq!(once.placement(), twice.placement());
  }

  #[test]
  fn navigation_does_not_wrap() {
    let mut completion = completion();
    completion.refresh("vo", 0, 0);

    completion.move_down();
    assert_eq!(completion.selected_item(), Some("void"));
    completion.move_down();
    completion.move_down();
    assert_eq!(completion.selected_item(), Some("volatile"));
    completion.move_up();
    completion.move_up();
    assert_eq!(completion.selected_item(), Some("void"));

    completion.refresh("vo", 0, 0);
    completion.move_up();
    assert_eq!(completion.selected_item(), Some("volatile"));
  }

  #[test]
  fn confirm_replaces_prefix_before_caret() {
    let mut doc = Rope::from("  vo;");
    let tx = confirm(&doc, 4, 2, "void").unwrap();
    tx.apply(&mut doc).unwrap();

    assert_eq!(doc, "  void;");
    assert_eq!(tx.selection(), Some(&Range::point(6)));
  }

  #[test]
  fn confirm_counts_back_across_line_breaks() {
    let mut doc = Rope::from("a\nvoid");
    confirm(&doc, 4, 4, "void").unwrap().apply(&mut doc).unwrap();
    assert_eq!(doc, "voidid");
  }

  #[test]
  fn confirm_with_long_prefix_stops_at_start() {
    let mut doc = Rope::from("x");
    confirm(&doc, 1, 5, "int").unwrap().apply(&mut doc).unwrap();
    assert_eq!(doc, "int");
  }
}
