//! Backend-neutral colors and text styles.

use std::str::FromStr;

use bitflags::bitflags;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
  #[default]
  Reset,
  Black,
  Red,
  Green,
  Yellow,
  Blue,
  Magenta,
  Cyan,
  Gray,
  LightRed,
  LightGreen,
  LightYellow,
  LightBlue,
  LightMagenta,
  LightCyan,
  LightGray,
  White,
  Rgb(u8, u8, u8),
  Indexed(u8),
}

bitflags! {
  #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
  pub struct Modifier: u16 {
    const BOLD        = 0b0000_0000_0001;
    const DIM         = 0b0000_0000_0010;
    const ITALIC      = 0b0000_0000_0100;
    const UNDERLINED  = 0b0000_0000_1000;
    const SLOW_BLINK  = 0b0000_0001_0000;
    const RAPID_BLINK = 0b0000_0010_0000;
    const REVERSED    = 0b0000_0100_0000;
    const HIDDEN      = 0b0000_1000_0000;
    const CROSSED_OUT = 0b0001_0000_0000;
  }
}

impl FromStr for Modifier {
  type Err = &'static str;

  fn from_str(modifier: &str) -> Result<Self, Self::Err> {
    match modifier {
      "bold" => Ok(Self::BOLD),
      "dim" => Ok(Self::DIM),
      "italic" => Ok(Self::ITALIC),
      "underlined" => Ok(Self::UNDERLINED),
      "slow_blink" => Ok(Self::SLOW_BLINK),
      "rapid_blink" => Ok(Self::RAPID_BLINK),
      "reversed" => Ok(Self::REVERSED),
      "hidden" => Ok(Self::HIDDEN),
      "crossed_out" => Ok(Self::CROSSED_OUT),
      _ => Err("Invalid modifier"),
    }
  }
}

/// A partial style: unset fields leave whatever is underneath untouched when
/// patched.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Style {
  pub fg:           Option<Color>,
  pub bg:           Option<Color>,
  pub add_modifier: Modifier,
  pub sub_modifier: Modifier,
}

impl Style {
  pub const fn new() -> Self {
    Self {
      fg:           None,
      bg:           None,
      add_modifier: Modifier::empty(),
      sub_modifier: Modifier::empty(),
    }
  }

  #[must_use]
  pub const fn fg(mut self, color: Color) -> Self {
    self.fg = Some(color);
    self
  }

  #[must_use]
  pub const fn bg(mut self, color: Color) -> Self {
    self.bg = Some(color);
    self
  }

  #[must_use]
  pub fn add_modifier(mut self, modifier: Modifier) -> Self {
    self.sub_modifier.remove(modifier);
    self.add_modifier.insert(modifier);
    self
  }

  #[must_use]
  pub fn remove_modifier(mut self, modifier: Modifier) -> Self {
    self.add_modifier.remove(modifier);
    self.sub_modifier.insert(modifier);
    self
  }

  /// Layer `other` on top of `self`.
  #[must_use]
  pub fn patch(mut self, other: Style) -> Self {
    self.fg = other.fg.or(self.fg);
    self.bg = other.bg.or(self.bg);

    self.add_modifier.remove(other.sub_modifier);
    self.add_modifier.insert(other.add_modifier);
    self.sub_modifier.remove(other.add_modifier);
    self.sub_modifier.insert(other.sub_modifier);
    self
  }
}
