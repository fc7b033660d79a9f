//! Rendering - draws the editor's render plan with ratatui widgets.

use ratatui::{
  Frame,
  layout::{
    Alignment,
    Rect,
  },
  text::{
    Line,
    Span,
  },
  widgets::{
    Block,
    Clear,
    List,
    ListState,
    Scrollbar,
    ScrollbarOrientation,
    ScrollbarState,
  },
};
use the_lib::{
  editor::Editor,
  render::{
    LinePlan,
    MenuPlan,
  },
};
use unicode_width::UnicodeWidthChar;

use crate::theme::to_style;

/// Rows the suggestion list shows before it scrolls.
const MENU_MAX_HEIGHT: u16 = 8;

/// Render the editor into the whole frame: text rows, then the status line
/// on the last row, then the suggestion list on top.
pub fn render(editor: &Editor, frame: &mut Frame) {
  let (text_area, status_area) = split_status(frame.area());
  let theme = editor.theme();
  let base = theme.get("ui.background").patch(theme.get("ui.text"));
  frame.render_widget(Block::default().style(to_style(base)), text_area);

  let top = editor.view().scroll_line;
  let plan = editor.render_plan(top..top + text_area.height as usize);

  for (row, line) in plan.lines.iter().enumerate() {
    let rect = Rect::new(text_area.x, text_area.y + row as u16, text_area.width, 1);
    frame.render_widget(to_line(line), rect);
  }

  let (cursor_block, cursor_column) = plan.cursor;
  let cursor = plan
    .lines
    .iter()
    .find(|line| line.block == cursor_block)
    .map(|line| {
      let x = text_area.x + display_column(line, cursor_column);
      let y = text_area.y + (cursor_block - top) as u16;
      (x, y)
    });
  if let Some((x, y)) = cursor {
    frame.set_cursor_position((x.min(text_area.right().saturating_sub(1)), y));
  }

  render_status(editor, frame, status_area, plan.cursor);

  if let Some(menu) = &plan.menu {
    let anchor = plan
      .lines
      .iter()
      .find(|line| line.block == menu.placement.line)
      .map(|line| {
        let x = text_area.x + display_column(line, menu.placement.column);
        let y = text_area.y + (menu.placement.line - top) as u16;
        (x, y)
      });
    if let Some(anchor) = anchor {
      let scroll_style = to_style(theme.get("ui.menu.scroll"));
      render_menu(frame, menu, anchor, text_area, scroll_style);
    }
  }
}

/// Keep the caret's line inside a viewport of `height` rows.
pub fn ensure_cursor_visible(editor: &mut Editor, height: usize) {
  let line = editor.cursor_line();
  let view = editor.view_mut();
  if line < view.scroll_line {
    view.scroll_line = line;
  } else if height > 0 && line >= view.scroll_line + height {
    view.scroll_line = line + 1 - height;
  }
}

/// Plain wheel scrolling, for scroll events the editor leaves to the host.
/// Positive `delta` moves the view up.
pub fn scroll_view(editor: &mut Editor, delta: i32) {
  let last = editor.document().len_blocks().saturating_sub(1);
  let view = editor.view_mut();
  let steps = delta.unsigned_abs() as usize;
  view.scroll_line = if delta > 0 {
    view.scroll_line.saturating_sub(steps)
  } else {
    (view.scroll_line + steps).min(last)
  };
}

/// The text viewport, and the one-row status line under it.
pub fn split_status(area: Rect) -> (Rect, Rect) {
  if area.height == 0 {
    return (area, area);
  }
  let text = Rect::new(area.x, area.y, area.width, area.height - 1);
  let status = Rect::new(area.x, area.bottom() - 1, area.width, 1);
  (text, status)
}

fn to_line(line: &LinePlan) -> Line<'static> {
  let spans: Vec<Span<'static>> = line
    .spans
    .iter()
    .map(|span| Span::styled(span.text.to_string(), to_style(span.style)))
    .collect();
  Line::from(spans).style(to_style(line.fill))
}

/// Terminal cells taken by the first `column` chars of `line`.
fn display_column(line: &LinePlan, column: usize) -> u16 {
  let width: usize = line
    .spans
    .iter()
    .flat_map(|span| span.text.chars())
    .take(column)
    .map(|ch| ch.width().unwrap_or(0))
    .sum();
  u16::try_from(width).unwrap_or(u16::MAX)
}

fn render_status(editor: &Editor, frame: &mut Frame, area: Rect, cursor: (usize, usize)) {
  if area.height == 0 {
    return;
  }
  let style = to_style(editor.theme().get("ui.statusline"));
  let (line, column) = cursor;
  let document = editor.document();
  let modified = if document.flags().modified { " [+]" } else { "" };
  let name = format!(" {}{modified}", document.display_name());
  let position = format!("{}:{}  {}pt ", line + 1, column + 1, editor.view().font_size());

  frame.render_widget(Line::from(name).style(style), area);
  frame.render_widget(Line::from(position).alignment(Alignment::Right), area);
}

/// Draw the list under the anchor cell, or above it when there is no room
/// below. The width comes from the placement and already leaves a column
/// for the scrollbar.
fn render_menu(
  frame: &mut Frame,
  menu: &MenuPlan,
  anchor: (u16, u16),
  bounds: Rect,
  scroll_style: ratatui::style::Style,
) {
  let height = u16::try_from(menu.items.len())
    .unwrap_or(u16::MAX)
    .min(MENU_MAX_HEIGHT)
    .min(bounds.height);
  let width = u16::try_from(menu.placement.width)
    .unwrap_or(u16::MAX)
    .min(bounds.width);
  if height == 0 || width == 0 {
    return;
  }

  let (x, y) = anchor;
  let x = x.min(bounds.right().saturating_sub(width));
  let y = if y + 1 + height <= bounds.bottom() {
    y + 1
  } else {
    y.saturating_sub(height).max(bounds.y)
  };
  let area = Rect::new(x, y, width, height);

  let list = List::new(menu.items.iter().map(String::as_str))
    .style(to_style(menu.style))
    .highlight_style(to_style(menu.selected_style));
  let mut state = ListState::default().with_selected(menu.selected);

  frame.render_widget(Clear, area);
  frame.render_stateful_widget(list, area, &mut state);

  if menu.items.len() > usize::from(height) {
    let mut scroll = ScrollbarState::new(menu.items.len()).position(menu.selected.unwrap_or(0));
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
      .begin_symbol(None)
      .end_symbol(None)
      .style(scroll_style);
    frame.render_stateful_widget(scrollbar, area, &mut scroll);
  }
}
