//! Types for the pack build step.

use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::artifacts::{ArtifactError, ArtifactFile};
use crate::materialize::{Extraction, MaterializeError};

/// Lifecycle of one build step. Any failure moves straight to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
  NotStarted,
  Preparing,
  ToolsReady,
  CommandBuilt,
  Executing,
  Succeeded,
  Failed,
}

/// Errors that fail a build step.
///
/// Command lines carried here are always the masked rendering.
#[derive(Debug, Error)]
pub enum StepError {
  #[error("artifact resolution failed: {0}")]
  Artifacts(#[from] ArtifactError),

  #[error("tool extraction failed: {0}")]
  Materialize(#[from] MaterializeError),

  #[error("failed to start {command}: {source}")]
  Spawn {
    command: String,
    #[source]
    source: io::Error,
  },

  #[error("{command} failed with exit code {}", .code.map_or_else(|| "none (terminated by signal)".to_string(), |c| c.to_string()))]
  CommandFailed { command: String, code: Option<i32> },

  #[error("io error while running {command}: {source}")]
  Io {
    command: String,
    #[source]
    source: io::Error,
  },
}

/// Directories a pack step works in.
#[derive(Debug, Clone)]
pub struct StepDirs {
  /// Base directory for artifact path rules.
  pub checkout_dir: PathBuf,
  /// Destination root for materialized tools.
  pub tools_dir: PathBuf,
}

/// Result of a successful pack step.
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
  pub tool: Extraction,
  pub artifacts: Vec<ArtifactFile>,
  pub output_dir: PathBuf,
  /// Masked command line that was executed.
  pub command: String,
  pub exit_code: i32,
}
