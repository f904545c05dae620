//! Types for resource materialization.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::catalog::Resource;
use crate::consts::{EXTRACT_BACKOFF, EXTRACT_MAX_ATTEMPTS};

/// Errors that abort materialization.
#[derive(Debug, Error)]
pub enum MaterializeError {
  /// A tool directory could not be created. Never retried.
  #[error("unable to create tool directory {}: {source}", .path.display())]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// Every extraction attempt for a resource failed.
  #[error(
    "failed to extract {resource} to {} after {attempts} attempt(s): {source}",
    .destination.display()
  )]
  Extract {
    resource: &'static str,
    destination: PathBuf,
    attempts: u32,
    #[source]
    source: io::Error,
  },
}

/// How extraction failures are retried.
///
/// The wait between attempts is fixed: no jitter, no growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  /// Total attempts, including the first.
  pub max_attempts: u32,
  pub backoff: Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      max_attempts: EXTRACT_MAX_ATTEMPTS,
      backoff: EXTRACT_BACKOFF,
    }
  }
}

/// One file to materialize. The destination path is the idempotency key.
#[derive(Debug, Clone)]
pub struct ExtractionTarget {
  pub resource: Resource,
  pub destination: PathBuf,
}

impl ExtractionTarget {
  pub fn new(resource: Resource, destination: impl Into<PathBuf>) -> Self {
    Self {
      resource,
      destination: destination.into(),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractStatus {
  /// Bytes were written to the destination during this call.
  Extracted,
  /// The destination already existed; nothing was written.
  AlreadyPresent,
}

/// Outcome of materializing a single resource.
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
  pub resource: &'static str,
  pub path: PathBuf,
  pub attempts: u32,
  pub status: ExtractStatus,
  /// Bytes copied; zero when already present.
  pub bytes: u64,
}

impl Extraction {
  pub fn was_written(&self) -> bool {
    self.status == ExtractStatus::Extracted
  }
}
