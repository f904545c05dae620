//! Interfaces consumed from the host build runtime.
//!
//! The host hands a build step a flat parameter map and a logger. Parameter
//! names follow the runner's conventions; keys prefixed with `secure:` hold
//! secrets and are never formatted.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::command::Secret;
use crate::consts::REDACTED;

/// Recognized runner parameter keys.
pub mod keys {
  pub const SERVER_URL: &str = "octopus_host";
  pub const API_KEY: &str = "secure:octopus_apikey";
  pub const PACKAGE_VERSION: &str = "octopus_packageversion";
  pub const NUSPEC_PATHS: &str = "octopus_nuspecpaths";
  pub const OUTPUT_DIR: &str = "packpub_outputdir";

  pub const SECURE_PREFIX: &str = "secure:";
}

/// Build log sink supplied by the host.
pub trait BuildLogger {
  fn message(&self, text: &str);

  fn warning(&self, text: &str) {
    self.message(text);
  }

  fn error(&self, text: &str) {
    self.message(text);
  }
}

/// Forwards build log lines to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl BuildLogger for TracingLogger {
  fn message(&self, text: &str) {
    info!("{}", text);
  }

  fn warning(&self, text: &str) {
    warn!("{}", text);
  }

  fn error(&self, text: &str) {
    error!("{}", text);
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
  Message,
  Warning,
  Error,
}

/// Keeps every line in memory, in order.
#[derive(Debug, Default)]
pub struct MemoryLogger {
  lines: Mutex<Vec<(LogLevel, String)>>,
}

impl MemoryLogger {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn lines(&self) -> Vec<(LogLevel, String)> {
    self.lines.lock().map(|lines| lines.clone()).unwrap_or_default()
  }

  pub fn messages(&self) -> Vec<String> {
    self.lines().into_iter().map(|(_, text)| text).collect()
  }

  pub fn contains(&self, needle: &str) -> bool {
    self.lines().iter().any(|(_, text)| text.contains(needle))
  }

  fn push(&self, level: LogLevel, text: &str) {
    if let Ok(mut lines) = self.lines.lock() {
      lines.push((level, text.to_string()));
    }
  }
}

impl BuildLogger for MemoryLogger {
  fn message(&self, text: &str) {
    self.push(LogLevel::Message, text);
  }

  fn warning(&self, text: &str) {
    self.push(LogLevel::Warning, text);
  }

  fn error(&self, text: &str) {
    self.push(LogLevel::Error, text);
  }
}

impl<L: BuildLogger + ?Sized> BuildLogger for &L {
  fn message(&self, text: &str) {
    (**self).message(text);
  }

  fn warning(&self, text: &str) {
    (**self).warning(text);
  }

  fn error(&self, text: &str) {
    (**self).error(text);
  }
}

#[derive(Debug, Error)]
pub enum ParameterError {
  #[error("invalid parameter '{0}': expected KEY=VALUE")]
  InvalidAssignment(String),

  #[error("failed to read parameters file {}: {source}", .path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse parameters file {}: {source}", .path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },
}

/// Read-only runner parameters for one build step.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunnerParameters(BTreeMap<String, String>);

impl RunnerParameters {
  pub fn new() -> Self {
    Self::default()
  }

  /// Load a JSON object of string values.
  pub fn from_json_file(path: &Path) -> Result<Self, ParameterError> {
    let content = std::fs::read_to_string(path).map_err(|source| ParameterError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    serde_json::from_str(&content).map_err(|source| ParameterError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Parse a `KEY=VALUE` assignment. The value may be empty.
  pub fn parse_assignment(assignment: &str) -> Result<(String, String), ParameterError> {
    match assignment.split_once('=') {
      Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.to_string())),
      _ => Err(ParameterError::InvalidAssignment(mask_assignment(assignment))),
    }
  }

  pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
    self.0.insert(key.into(), value.into());
  }

  pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.insert(key, value);
    self
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.0.get(key).map(String::as_str)
  }

  pub fn server_url(&self) -> Option<&str> {
    self.get(keys::SERVER_URL)
  }

  pub fn api_key(&self) -> Option<Secret> {
    self.get(keys::API_KEY).map(Secret::new)
  }

  pub fn package_version(&self) -> Option<&str> {
    self.get(keys::PACKAGE_VERSION)
  }

  pub fn nuspec_paths(&self) -> Option<&str> {
    self.get(keys::NUSPEC_PATHS)
  }

  pub fn output_dir(&self) -> Option<&str> {
    self.get(keys::OUTPUT_DIR).filter(|dir| !dir.trim().is_empty())
  }
}

impl fmt::Debug for RunnerParameters {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_map()
      .entries(self.0.iter().map(|(key, value)| {
        if key.starts_with(keys::SECURE_PREFIX) {
          (key.as_str(), REDACTED)
        } else {
          (key.as_str(), value.as_str())
        }
      }))
      .finish()
  }
}

fn mask_assignment(assignment: &str) -> String {
  if assignment.starts_with(keys::SECURE_PREFIX) {
    keys::SECURE_PREFIX.to_string() + "..."
  } else {
    assignment.to_string()
  }
}
