use std::{
  collections::HashMap,
  sync::OnceLock,
};

use serde::{
  Deserialize,
  Deserializer,
};
use toml::{
  Value,
  map::Map,
};
use tracing::warn;

pub use super::graphics::{
  Color,
  Modifier,
  Style,
};
use crate::syntax::Scope;

static DEFAULT_THEME_DATA: OnceLock<Value> = OnceLock::new();
static DEFAULT_THEME: OnceLock<Theme> = OnceLock::new();

fn default_theme_data() -> &'static Value {
  DEFAULT_THEME_DATA.get_or_init(|| {
    toml::from_str(include_str!("../theme.toml")).unwrap_or_else(|err| {
      warn!("Failed to parse embedded theme: {err}");
      Value::Table(Map::new())
    })
  })
}

/// The built-in Dracula theme.
pub fn default_theme() -> &'static Theme {
  DEFAULT_THEME.get_or_init(|| Theme {
    name: "dracula".into(),
    ..Theme::from(default_theme_data().clone())
  })
}

#[derive(Clone, Debug, Default)]
pub struct Theme {
  name:    String,
  styles:  HashMap<String, Style>,
  /// Named colors, kept so overrides can refer to them.
  palette: HashMap<String, Color>,
}

impl From<Value> for Theme {
  fn from(value: Value) -> Self {
    let (theme, warnings) = Theme::from_toml(value);
    for warning in warnings {
      warn!("{}", warning);
    }
    theme
  }
}

impl<'de> Deserialize<'de> for Theme {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    let values = Map::<String, Value>::deserialize(deserializer)?;
    let (theme, warnings) = Theme::from_keys(values);
    for warning in warnings {
      warn!("{}", warning);
    }
    Ok(theme)
  }
}

fn build_theme_values(
  mut values: Map<String, Value>,
  base: ThemePalette,
) -> (HashMap<String, Style>, ThemePalette, Vec<String>) {
  let mut styles = HashMap::new();
  let mut warnings = Vec::new();

  let palette = match values.remove("palette") {
    Some(value) => {
      let fallback = ThemePalette {
        palette: base.palette.clone(),
      };
      base.extended(value).unwrap_or_else(|err| {
        warnings.push(err);
        fallback
      })
    },
    None => base,
  };
  styles.reserve(values.len());

  for (name, style_value) in values {
    let mut style = Style::default();
    if let Err(err) = palette.parse_style(&mut style, style_value) {
      warnings.push(format!("Failed to parse style for key {name:?}. {err}"));
    }
    styles.insert(name, style);
  }

  (styles, palette, warnings)
}

impl Theme {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn get(&self, scope: &str) -> Style {
    self.try_get(scope).unwrap_or_default()
  }

  /// Get the style of a scope, falling back to dot separated broader
  /// scopes. For example if `comment.block` is not defined in the theme,
  /// `comment` is tried.
  pub fn try_get(&self, scope: &str) -> Option<Style> {
    std::iter::successors(Some(scope), |s| Some(s.rsplit_once('.')?.0))
      .find_map(|s| self.styles.get(s).copied())
  }

  pub fn try_get_exact(&self, scope: &str) -> Option<Style> {
    self.styles.get(scope).copied()
  }

  /// Style painted for a highlight scope.
  pub fn highlight(&self, scope: Scope) -> Style {
    self.get(scope.as_str())
  }

  /// Layer `overrides` (same shape as a theme file) over this theme. Colors
  /// in the override may name entries of this theme's palette.
  #[must_use]
  pub fn merged(&self, overrides: Map<String, Value>) -> Theme {
    let base = ThemePalette {
      palette: self.palette.clone(),
    };
    let (theme, warnings) = Theme::from_keys_with(overrides, base);
    for warning in warnings {
      warn!("{}", warning);
    }

    let mut styles = self.styles.clone();
    styles.extend(theme.styles);
    Theme {
      name: self.name.clone(),
      styles,
      palette: theme.palette,
    }
  }

  fn from_toml(value: Value) -> (Self, Vec<String>) {
    if let Value::Table(table) = value {
      Theme::from_keys(table)
    } else {
      warn!("Expected theme TOML value to be a table, found {:?}", value);
      Default::default()
    }
  }

  fn from_keys(toml_keys: Map<String, Value>) -> (Self, Vec<String>) {
    Self::from_keys_with(toml_keys, ThemePalette::default())
  }

  fn from_keys_with(toml_keys: Map<String, Value>, base: ThemePalette) -> (Self, Vec<String>) {
    let (styles, palette, load_errors) = build_theme_values(toml_keys, base);
    let theme = Self {
      styles,
      palette: palette.palette,
      ..Default::default()
    };
    (theme, load_errors)
  }
}

struct ThemePalette {
  palette: HashMap<String, Color>,
}

impl Default for ThemePalette {
  fn default() -> Self {
    let palette = HashMap::from(
      [
        ("default", Color::Reset),
        ("black", Color::Black),
        ("red", Color::Red),
        ("green", Color::Green),
        ("yellow", Color::Yellow),
        ("blue", Color::Blue),
        ("magenta", Color::Magenta),
        ("cyan", Color::Cyan),
        ("gray", Color::Gray),
        ("light-red", Color::LightRed),
        ("light-green", Color::LightGreen),
        ("light-yellow", Color::LightYellow),
        ("light-blue", Color::LightBlue),
        ("light-magenta", Color::LightMagenta),
        ("light-cyan", Color::LightCyan),
        ("light-gray", Color::LightGray),
        ("white", Color::White),
      ]
      .map(|(name, color)| (name.to_string(), color)),
    );
    Self { palette }
  }
}

impl ThemePalette {
  /// Add the colors of a `palette` table on top of the current ones.
  fn extended(mut self, value: Value) -> Result<Self, String> {
    let Value::Table(map) = value else {
      return Ok(self);
    };

    for (name, value) in map {
      let value = Self::parse_value_as_str(&value)?;
      let color = Self::string_to_rgb(value)?;
      self.palette.insert(name, color);
    }
    Ok(self)
  }

  fn string_to_rgb(s: &str) -> Result<Color, String> {
    if s.starts_with('#') {
      Self::hex_string_to_rgb(s)
    } else {
      Self::ansi_string_to_rgb(s)
    }
  }

  fn ansi_string_to_rgb(s: &str) -> Result<Color, String> {
    if let Ok(index) = s.parse::<u8>() {
      return Ok(Color::Indexed(index));
    }
    Err(format!("Malformed ANSI: {}", s))
  }

  fn hex_string_to_rgb(s: &str) -> Result<Color, String> {
    let channel = |range: std::ops::Range<usize>| {
      s.get(range)
        .and_then(|hex| u8::from_str_radix(hex, 16).ok())
    };
    if let (Some(red), Some(green), Some(blue)) = (channel(1..3), channel(3..5), channel(5..7)) {
      return Ok(Color::Rgb(red, green, blue));
    }

    Err(format!("Malformed hexcode: {}", s))
  }

  fn parse_value_as_str(value: &Value) -> Result<&str, String> {
    value
      .as_str()
      .ok_or(format!("Unrecognized value: {}", value))
  }

  fn parse_color(&self, value: Value) -> Result<Color, String> {
    let value = Self::parse_value_as_str(&value)?;

    self
      .palette
      .get(value)
      .copied()
      .ok_or("")
      .or_else(|_| Self::string_to_rgb(value))
  }

  fn parse_modifier(value: &Value) -> Result<Modifier, String> {
    value
      .as_str()
      .and_then(|s| s.parse().ok())
      .ok_or(format!("Invalid modifier: {}", value))
  }

  fn parse_style(&self, style: &mut Style, value: Value) -> Result<(), String> {
    if let Value::Table(entries) = value {
      for (name, value) in entries {
        match name.as_str() {
          "fg" => *style = style.fg(self.parse_color(value)?),
          "bg" => *style = style.bg(self.parse_color(value)?),
          "modifiers" => {
            let modifiers = value.as_array().ok_or("Modifiers should be an array")?;
            for modifier in modifiers {
              *style = style.add_modifier(Self::parse_modifier(modifier)?);
            }
          },
          _ => return Err(format!("Invalid style attribute: {}", name)),
        }
      }
    } else {
      *style = style.fg(self.parse_color(value)?);
    }
    Ok(())
  }
}
