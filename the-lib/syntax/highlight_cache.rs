//! Per-block highlight results for one document.
//!
//! The cache holds one [`BlockHighlight`] per line. After an edit only the
//! touched blocks are recomputed, then the following blocks are recomputed one
//! by one for as long as the state flowing into them differs from what they
//! were last highlighted with. Propagation always runs to completion before
//! returning, so the cache is consistent with the document afterwards.
//!
//! # Example
//!
//! ```
//! use ropey::Rope;
//! use the_lib::{
//!   document::Document,
//!   syntax::{
//!     BlockState,
//!     HighlightCache,
//!     Highlighter,
//!   },
//! };
//!
//! let highlighter = Highlighter::cpp().unwrap();
//! let doc = Document::new(Rope::from("/* a\nb\nc */ int x;"));
//! let cache = HighlightCache::new(&doc, &highlighter);
//! assert_eq!(cache.previous_state(2), BlockState::InBlockComment);
//! ```
use std::ops;

use super::{
  BlockHighlight,
  BlockState,
  Highlighter,
};
use crate::document::{
  Document,
  LineEdit,
};

#[derive(Debug, Clone, Default)]
pub struct HighlightCache {
  blocks:      Vec<BlockHighlight>,
  /// Document version the cache was last brought up to date with.
  doc_version: u64,
}

impl HighlightCache {
  /// Highlight every block of `doc` from the top.
  pub fn new(doc: &Document, highlighter: &Highlighter) -> Self {
    let mut cache = Self::default();
    cache.rebuild(doc, highlighter);
    cache
  }

  pub fn rebuild(&mut self, doc: &Document, highlighter: &Highlighter) {
    let mut previous = BlockState::Normal;
    self.blocks = (0..doc.len_blocks())
      .map(|idx| {
        let block = highlighter.highlight_block(&doc.block_text(idx), previous);
        previous = block.state();
        block
      })
      .collect();
    self.doc_version = doc.version();
  }

  pub fn len(&self) -> usize {
    self.blocks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.blocks.is_empty()
  }

  pub fn doc_version(&self) -> u64 {
    self.doc_version
  }

  pub fn block(&self, idx: usize) -> Option<&BlockHighlight> {
    self.blocks.get(idx)
  }

  /// State flowing into block `idx`: the first block always starts normal.
  pub fn previous_state(&self, idx: usize) -> BlockState {
    idx
      .checked_sub(1)
      .and_then(|prev| self.blocks.get(prev))
      .map_or(BlockState::Normal, BlockHighlight::state)
  }

  /// Bring the cache up to date after `edit` was applied to `doc`. Returns
  /// the blocks that were recomputed.
  pub fn apply_edit(
    &mut self,
    doc: &Document,
    highlighter: &Highlighter,
    edit: LineEdit,
  ) -> ops::Range<usize> {
    let start = edit.start.min(self.blocks.len());
    let old_end = edit.old_end.clamp(start, self.blocks.len().saturating_sub(1));

    // the last placeholder keeps the old outgoing state so propagation can
    // tell whether the blocks below need to be revisited
    let old_state = self
      .blocks
      .get(old_end)
      .map_or(BlockState::Normal, BlockHighlight::state);
    let inserted = edit.new_end.saturating_sub(edit.start) + 1;
    let mut placeholders = vec![BlockHighlight::default(); inserted];
    if let Some(last) = placeholders.last_mut() {
      *last = BlockHighlight::new(Vec::new(), old_state);
    }

    let removed = if self.blocks.is_empty() {
      start..start
    } else {
      start..old_end + 1
    };
    self.blocks.splice(removed, placeholders);

    if self.blocks.len() != doc.len_blocks() {
      tracing::warn!(
        cached = self.blocks.len(),
        blocks = doc.len_blocks(),
        "highlight cache out of sync with document, rebuilding"
      );
      self.rebuild(doc, highlighter);
      return 0..self.blocks.len();
    }

    let refreshed = self.highlight_from(doc, highlighter, start, start + inserted - 1);
    self.doc_version = doc.version();
    refreshed
  }

  /// Recompute block `idx` even though its text did not change, then
  /// propagate. Out-of-range indices are clamped to the last block.
  pub fn rehighlight(
    &mut self,
    doc: &Document,
    highlighter: &Highlighter,
    idx: usize,
  ) -> ops::Range<usize> {
    if self.blocks.len() != doc.len_blocks() {
      self.rebuild(doc, highlighter);
      return 0..self.blocks.len();
    }
    let idx = idx.min(self.blocks.len().saturating_sub(1));
    self.highlight_from(doc, highlighter, idx, idx)
  }

  /// Recompute `start..=forced_end` unconditionally, then continue while a
  /// block's outgoing state differs from its previous value.
  fn highlight_from(
    &mut self,
    doc: &Document,
    highlighter: &Highlighter,
    start: usize,
    forced_end: usize,
  ) -> ops::Range<usize> {
    let mut idx = start;
    while idx < self.blocks.len() {
      let previous = self.previous_state(idx);
      let fresh = highlighter.highlight_block(&doc.block_text(idx), previous);
      let unchanged = fresh.state() == self.blocks[idx].state();
      self.blocks[idx] = fresh;
      idx += 1;

      if idx > forced_end && unchanged {
        break;
      }
    }

    if idx - start > 1 {
      tracing::debug!(start, end = idx, "rehighlighted blocks");
    }
    start..idx
  }
}
