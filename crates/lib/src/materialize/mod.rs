//! Resource materialization.
//!
//! Copies bundled tool binaries out of a [`ResourceStore`] onto the local
//! filesystem. Every extraction is idempotent: a file at the destination path
//! means the resource is already materialized and nothing is written.
//!
//! Writes go to a sibling `<name>.partial` file which is renamed into place
//! only after the copy is flushed and synced, so the destination path never
//! holds a truncated binary. Failed attempts are retried with a fixed backoff
//! (see [`RetryPolicy`]); directory creation failures are not retried.
//!
//! # Layout
//!
//! ```text
//! <root>/
//! ├── 1.0/Octo.exe, 1.0/Octo.exe.config
//! ├── 2.0/...
//! ├── 3.0/...
//! └── nuget.exe
//! ```

mod types;

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::catalog::{PACKAGING_TOOL, RELEASE_TOOLS, Resource, VersionedTool};
use crate::consts::{EXTRACT_CHUNK_SIZE, PARTIAL_SUFFIX};
use crate::resources::ResourceStore;

pub use types::{ExtractStatus, Extraction, ExtractionTarget, MaterializeError, RetryPolicy};

/// Extracts catalog resources from a store into destination directories.
#[derive(Debug, Clone)]
pub struct Materializer<S> {
  store: S,
  policy: RetryPolicy,
}

impl<S: ResourceStore> Materializer<S> {
  pub fn new(store: S) -> Self {
    Self {
      store,
      policy: RetryPolicy::default(),
    }
  }

  pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
    self.policy = policy;
    self
  }

  /// Ensure every release tool version is materialized under `root`.
  ///
  /// Creates `<root>/<version>/` for each catalog entry, then extracts the
  /// executable and its config into it.
  pub async fn ensure_tools_extracted(&self, root: &Path) -> Result<Vec<Extraction>, MaterializeError> {
    let mut extractions = Vec::new();
    for tool in &RELEASE_TOOLS {
      extractions.extend(self.ensure_tool_extracted(root, tool).await?);
    }
    Ok(extractions)
  }

  /// Ensure a single release tool version is materialized under `root`.
  pub async fn ensure_tool_extracted(
    &self,
    root: &Path,
    tool: &VersionedTool,
  ) -> Result<Vec<Extraction>, MaterializeError> {
    let dir = root.join(tool.version);
    ensure_dir(&dir).await?;

    let mut extractions = Vec::new();
    for resource in tool.resources() {
      let target = ExtractionTarget::new(*resource, dir.join(resource.file_name));
      extractions.push(self.extract_one(&target).await?);
    }
    Ok(extractions)
  }

  /// Ensure the packaging tool is materialized directly under `root`.
  pub async fn ensure_packaging_tool_extracted(&self, root: &Path) -> Result<Extraction, MaterializeError> {
    ensure_dir(root).await?;
    let target = ExtractionTarget::new(PACKAGING_TOOL, root.join(PACKAGING_TOOL.file_name));
    self.extract_one(&target).await
  }

  /// Materialize one resource, retrying failed attempts.
  ///
  /// Each attempt re-checks the destination first. After the final attempt
  /// fails, its error is returned with the resource and destination attached.
  pub async fn extract_one(&self, target: &ExtractionTarget) -> Result<Extraction, MaterializeError> {
    let max_attempts = self.policy.max_attempts.max(1);
    let mut attempts = 0;

    loop {
      attempts += 1;

      match self.try_extract(target).await {
        Ok((status, bytes)) => {
          match status {
            ExtractStatus::Extracted => {
              info!(resource = target.resource.id, path = ?target.destination, bytes, attempts, "extracted resource")
            }
            ExtractStatus::AlreadyPresent => {
              debug!(resource = target.resource.id, path = ?target.destination, "resource already present")
            }
          }
          return Ok(Extraction {
            resource: target.resource.id,
            path: target.destination.clone(),
            attempts,
            status,
            bytes,
          });
        }
        Err(source) if attempts >= max_attempts => {
          return Err(MaterializeError::Extract {
            resource: target.resource.id,
            destination: target.destination.clone(),
            attempts,
            source,
          });
        }
        Err(err) => {
          warn!(
            resource = target.resource.id,
            path = ?target.destination,
            attempt = attempts,
            error = %err,
            backoff = ?self.policy.backoff,
            "extraction attempt failed, retrying"
          );
          tokio::time::sleep(self.policy.backoff).await;
        }
      }
    }
  }

  async fn try_extract(&self, target: &ExtractionTarget) -> io::Result<(ExtractStatus, u64)> {
    if fs::try_exists(&target.destination).await? {
      return Ok((ExtractStatus::AlreadyPresent, 0));
    }

    let partial = partial_path(&target.destination);
    let result = async {
      let bytes = self.write_partial(&target.resource, &partial).await?;
      fs::rename(&partial, &target.destination).await?;
      Ok::<u64, io::Error>(bytes)
    }
    .await;

    match result {
      Ok(bytes) => Ok((ExtractStatus::Extracted, bytes)),
      Err(err) => {
        discard_partial(&partial).await;
        Err(err)
      }
    }
  }

  /// Stream the resource into `partial` in fixed-size chunks.
  async fn write_partial(&self, resource: &Resource, partial: &Path) -> io::Result<u64> {
    let mut reader = self.store.open(resource)?;
    let mut file = fs::File::create(partial).await?;

    let mut buffer = vec![0u8; EXTRACT_CHUNK_SIZE];
    let mut total = 0u64;
    loop {
      let read = reader.read(&mut buffer).await?;
      if read == 0 {
        break;
      }
      file.write_all(&buffer[..read]).await?;
      total += read as u64;
    }

    file.flush().await?;
    file.sync_all().await?;
    drop(file);

    if resource.executable {
      mark_executable(partial).await?;
    }

    Ok(total)
  }
}

/// Create a directory (and parents) unless it already exists.
async fn ensure_dir(path: &Path) -> Result<(), MaterializeError> {
  fs::create_dir_all(path).await.map_err(|source| MaterializeError::CreateDir {
    path: path.to_path_buf(),
    source,
  })
}

/// Sibling path an extraction writes to before renaming.
pub fn partial_path(destination: &Path) -> PathBuf {
  let mut name = destination.file_name().map(OsString::from).unwrap_or_default();
  name.push(PARTIAL_SUFFIX);
  destination.with_file_name(name)
}

async fn discard_partial(partial: &Path) {
  match fs::remove_file(partial).await {
    Ok(()) => debug!(path = ?partial, "removed partial extraction"),
    Err(err) if err.kind() == io::ErrorKind::NotFound => {}
    Err(err) => warn!(path = ?partial, error = %err, "failed to remove partial extraction"),
  }
}

#[cfg(unix)]
async fn mark_executable(path: &Path) -> io::Result<()> {
  use std::os::unix::fs::PermissionsExt;
  fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).await
}

#[cfg(not(unix))]
async fn mark_executable(_path: &Path) -> io::Result<()> {
  Ok(())
}
