//! Render plan construction.
//!
//! A render plan is a backend-agnostic description of what to draw: styled
//! runs per block, the caret line highlight, and the suggestion list. Hosts
//! consume the plan and handle actual drawing.
//!
//! # Example
//!
//! ```
//! use the_lib::{
//!   render::{
//!     plan::LinePlan,
//!     theme::default_theme,
//!   },
//!   syntax::{
//!     BlockState,
//!     Highlighter,
//!   },
//! };
//!
//! let highlighter = Highlighter::cpp().unwrap();
//! let block = highlighter.highlight_block("int x = 5;", BlockState::Normal);
//! let line = LinePlan::build(0, "int x = 5;", &block, default_theme(), false);
//! assert_eq!(line.spans[0].text, "int");
//! ```

use crate::{
  Tendril,
  completion::{
    Completion,
    Placement,
  },
  render::{
    graphics::Style,
    theme::Theme,
  },
  syntax::{
    BlockHighlight,
    Scope,
  },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSpan {
  /// Char offset inside the block.
  pub start: usize,
  pub text:  Tendril,
  pub scope: Option<Scope>,
  pub style: Style,
}

impl RenderSpan {
  fn end(&self) -> usize {
    self.start + self.text.chars().count()
  }
}

/// One block, fully covered by styled spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinePlan {
  pub block:      usize,
  pub spans:      Vec<RenderSpan>,
  /// The caret is on this block; hosts paint the full row background.
  pub cursorline: bool,
  /// Style for the part of the row past the text.
  pub fill:       Style,
}

impl LinePlan {
  /// Style `text` with the resolved scopes of `highlight`. Characters no span
  /// covers get the plain text style.
  pub fn build(
    block: usize,
    text: &str,
    highlight: &BlockHighlight,
    theme: &Theme,
    cursorline: bool,
  ) -> Self {
    let mut fill = theme.get("ui.background").patch(theme.get("ui.text"));
    if cursorline {
      fill = fill.patch(theme.get("ui.cursorline"));
    }

    let mut line = Self {
      block,
      spans: Vec::new(),
      cursorline,
      fill,
    };

    let chars: Vec<char> = text.chars().collect();
    let mut pos = 0;
    for (range, scope) in highlight.resolve() {
      let end = range.end.min(chars.len());
      if range.start >= end {
        continue;
      }
      if pos < range.start {
        line.push_span(pos, &chars[pos..range.start], None, fill);
      }
      let style = fill.patch(theme.highlight(scope));
      line.push_span(range.start, &chars[range.start..end], Some(scope), style);
      pos = end;
    }
    if pos < chars.len() {
      line.push_span(pos, &chars[pos..], None, fill);
    }

    line
  }

  fn push_span(&mut self, start: usize, chars: &[char], scope: Option<Scope>, style: Style) {
    if let Some(last) = self.spans.last_mut() {
      if last.style == style && last.scope == scope && last.end() == start {
        last.text.extend(chars.iter().copied());
        return;
      }
    }
    self.spans.push(RenderSpan {
      start,
      text: chars.iter().copied().collect(),
      scope,
      style,
    });
  }

  /// The block's text, reassembled from its spans.
  pub fn text(&self) -> String {
    self.spans.iter().map(|span| span.text.as_str()).collect()
  }
}

/// The suggestion list, ready to draw at [`Placement`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuPlan {
  pub placement:      Placement,
  pub items:          Vec<String>,
  pub selected:       Option<usize>,
  pub style:          Style,
  pub selected_style: Style,
}

impl MenuPlan {
  /// `None` while the popup is hidden.
  pub fn build(completion: &Completion, theme: &Theme) -> Option<Self> {
    if !completion.is_visible() {
      return None;
    }
    let style = theme.get("ui.menu");
    Some(Self {
      placement: completion.placement(),
      items: completion.items().to_vec(),
      selected: completion.selected(),
      style,
      selected_style: style.patch(theme.get("ui.menu.selected")),
    })
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPlan {
  pub lines:  Vec<LinePlan>,
  /// Caret position as `(block, char column)`.
  pub cursor: (usize, usize),
  pub menu:   Option<MenuPlan>,
}
