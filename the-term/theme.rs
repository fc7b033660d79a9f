//! Conversion from the-lib's backend-neutral styles to ratatui styles.

use ratatui::style::{
  Color as TermColor,
  Modifier as TermModifier,
  Style as TermStyle,
};
use the_lib::render::graphics::{
  Color,
  Modifier,
  Style,
};

pub fn to_color(color: Color) -> TermColor {
  match color {
    Color::Reset => TermColor::Reset,
    Color::Black => TermColor::Black,
    Color::Red => TermColor::Red,
    Color::Green => TermColor::Green,
    Color::Yellow => TermColor::Yellow,
    Color::Blue => TermColor::Blue,
    Color::Magenta => TermColor::Magenta,
    Color::Cyan => TermColor::Cyan,
    Color::Gray => TermColor::DarkGray,
    Color::LightRed => TermColor::LightRed,
    Color::LightGreen => TermColor::LightGreen,
    Color::LightYellow => TermColor::LightYellow,
    Color::LightBlue => TermColor::LightBlue,
    Color::LightMagenta => TermColor::LightMagenta,
    Color::LightCyan => TermColor::LightCyan,
    Color::LightGray => TermColor::Gray,
    Color::White => TermColor::White,
    Color::Rgb(r, g, b) => TermColor::Rgb(r, g, b),
    Color::Indexed(idx) => TermColor::Indexed(idx),
  }
}

fn to_modifier(modifier: Modifier) -> TermModifier {
  const PAIRS: [(Modifier, TermModifier); 9] = [
    (Modifier::BOLD, TermModifier::BOLD),
    (Modifier::DIM, TermModifier::DIM),
    (Modifier::ITALIC, TermModifier::ITALIC),
    (Modifier::UNDERLINED, TermModifier::UNDERLINED),
    (Modifier::SLOW_BLINK, TermModifier::SLOW_BLINK),
    (Modifier::RAPID_BLINK, TermModifier::RAPID_BLINK),
    (Modifier::REVERSED, TermModifier::REVERSED),
    (Modifier::HIDDEN, TermModifier::HIDDEN),
    (Modifier::CROSSED_OUT, TermModifier::CROSSED_OUT),
  ];

  PAIRS
    .iter()
    .filter(|(ours, _)| modifier.contains(*ours))
    .fold(TermModifier::empty(), |acc, (_, theirs)| acc | *theirs)
}

pub fn to_style(style: Style) -> TermStyle {
  TermStyle {
    fg: style.fg.map(to_color),
    bg: style.bg.map(to_color),
    add_modifier: to_modifier(style.add_modifier),
    sub_modifier: to_modifier(style.sub_modifier),
    ..TermStyle::default()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unset_fields_stay_unset() {
    let style = to_style(Style::default());
    assert_eq!(style.fg, None);
    assert_eq!(style.bg, None);
  }

  #[test]
  fn colors_and_modifiers_carry_over() {
    let style = to_style(
      Style::default()
        .fg(Color::Rgb(0xff, 0x79, 0xc6))
        .bg(Color::Gray)
        .add_modifier(Modifier::BOLD | Modifier::ITALIC),
    );
    assert_eq!(style.fg, Some(TermColor::Rgb(0xff, 0x79, 0xc6)));
    assert_eq!(style.bg, Some(TermColor::DarkGray));
    assert_eq!(style.add_modifier, TermModifier::BOLD | TermModifier::ITALIC);
  }
}
