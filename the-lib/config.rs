//! Editor configuration.
//!
//! Read once at startup from a TOML file; every key is optional.
//!
//! ```toml
//! font-size = 16
//! cursorline = true
//!
//! [completion]
//! scrollbar-width = 1
//! words = ["alpha", "beta"]
//!
//! [theme]
//! keyword = "#ff0000"
//! ```

use std::{
  fs,
  io,
  path::{
    Path,
    PathBuf,
  },
};

use serde::Deserialize;
use thiserror::Error;
use toml::{
  Value,
  map::Map,
};

use crate::{
  completion::CandidateSet,
  render::theme::{
    Theme,
    default_theme,
  },
};

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config {path}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },
  #[error(transparent)]
  Parse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct CompletionConfig {
  /// Cells added to the longest candidate when sizing the popup.
  pub scrollbar_width: u16,
  /// Replaces the built-in keyword list.
  pub words:           Option<Vec<String>>,
}

impl Default for CompletionConfig {
  fn default() -> Self {
    Self {
      scrollbar_width: 1,
      words:           None,
    }
  }
}

impl CompletionConfig {
  pub fn candidates(&self) -> CandidateSet {
    match &self.words {
      Some(words) => CandidateSet::new(words.iter().cloned()),
      None => CandidateSet::cpp(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
  pub font_size:  u16,
  pub cursorline: bool,
  pub completion: CompletionConfig,
  /// Scope styles layered over the built-in theme.
  pub theme:      Map<String, Value>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      font_size:  14,
      cursorline: true,
      completion: CompletionConfig::default(),
      theme:      Map::new(),
    }
  }
}

impl Config {
  pub fn load(path: &Path) -> Result<Self> {
    let contents = fs::read_to_string(path).map_err(|source| {
      ConfigError::Io {
        path: path.to_path_buf(),
        source,
      }
    })?;
    contents.parse()
  }

  /// The built-in theme with this config's overrides applied.
  pub fn theme(&self) -> Theme {
    if self.theme.is_empty() {
      return default_theme().clone();
    }
    default_theme().merged(self.theme.clone())
  }
}

impl std::str::FromStr for Config {
  type Err = ConfigError;

  fn from_str(contents: &str) -> Result<Self> {
    Ok(toml::from_str(contents)?)
  }
}
