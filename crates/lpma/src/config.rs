//! Configuration management for lpma
//!
//! Settings live in an optional JSON file. Every field has a default, so a
//! missing file, or a file holding only some of the keys, is fine.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{LpmaError, Result};
use crate::format::{DEFAULT_LABEL_WIDTH, DEFAULT_LINE_WIDTH};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
  /// Project store location; falls back to the per-user state directory
  #[serde(default)]
  pub data_file: Option<PathBuf>,
  /// Width of header, footer and separator lines
  #[serde(default = "default_line_width")]
  pub line_width: usize,
  /// Width of the label column in listings
  #[serde(default = "default_label_width")]
  pub label_width: usize,
}

fn default_line_width() -> usize {
  DEFAULT_LINE_WIDTH
}
fn default_label_width() -> usize {
  DEFAULT_LABEL_WIDTH
}

impl Default for Config {
  fn default() -> Self {
    Self {
      data_file: None,
      line_width: default_line_width(),
      label_width: default_label_width(),
    }
  }
}

impl Config {
  /// Load configuration from a file
  pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| LpmaError::io(path, e))?;
    serde_json::from_str(&content)
      .map_err(|source| LpmaError::Config { path: path.to_path_buf(), source })
  }

  /// Load the explicit config file if given, else the per-user one if it
  /// exists, else defaults
  pub fn load(explicit: Option<&Path>) -> Result<Self> {
    if let Some(path) = explicit {
      return Self::load_from_file(path);
    }

    match default_config_path() {
      Some(path) if path.exists() => Self::load_from_file(path),
      _ => Ok(Config::default()),
    }
  }

  /// Pick the data file: an explicit override wins over the configured one,
  /// which wins over the per-user default
  pub fn data_file(&self, explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
      return Ok(path.to_path_buf());
    }
    if let Some(path) = &self.data_file {
      return Ok(path.clone());
    }
    default_data_file()
  }
}

/// `<config dir>/lpma/config.json`
pub fn default_config_path() -> Option<PathBuf> {
  dirs::config_dir().map(|dir| dir.join("lpma").join("config.json"))
}

/// `<state dir>/lpma/data.json`, with `~/.local/state` standing in on
/// platforms without a state directory
pub fn default_data_file() -> Result<PathBuf> {
  let state_dir = match dirs::state_dir() {
    Some(dir) => dir,
    None => dirs::home_dir().ok_or(LpmaError::NoHomeDir)?.join(".local").join("state"),
  };
  Ok(state_dir.join("lpma").join("data.json"))
}
