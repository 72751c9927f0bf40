use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LpmaError {
  #[error("Project '{key}' doesn't exist")]
  NotFound { key: String },

  #[error("Project '{key}' already exists")]
  AlreadyExists { key: String },

  #[error("Invalid {field}: {reason}")]
  InvalidField { field: &'static str, reason: String },

  #[error("At least one field must be provided to edit '{key}'")]
  EmptyEdit { key: String },

  #[error("Could not access project store {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Project store {} is not a valid project document: {source}", path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("Could not serialize projects for {}: {source}", path.display())]
  Serialize {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("Invalid configuration file {}: {source}", path.display())]
  Config {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("Could not determine home directory")]
  NoHomeDir,
}

impl LpmaError {
  pub fn not_found(key: impl Into<String>) -> Self {
    Self::NotFound { key: key.into() }
  }

  pub fn already_exists(key: impl Into<String>) -> Self {
    Self::AlreadyExists { key: key.into() }
  }

  pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Io { path: path.into(), source }
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::NotFound { .. })
  }
}

pub type Result<T> = std::result::Result<T, LpmaError>;
