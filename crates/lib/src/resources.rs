//! Sources of bundled resource bytes.
//!
//! The materializer reads every catalog entry through a [`ResourceStore`].
//! [`BundleDir`] serves files laid out on disk under their resource ids;
//! [`MemoryStore`] serves bytes held in the process (for hosts that embed the
//! tools with `include_bytes!`).

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use tokio::io::AsyncRead;

use crate::catalog::Resource;

/// A readable stream over one resource's bytes.
pub type ResourceReader<'a> = Box<dyn AsyncRead + Send + Unpin + 'a>;

pub trait ResourceStore {
  /// Open a resource for streaming.
  ///
  /// Called once per extraction attempt, so implementations must hand out a
  /// fresh stream positioned at the start each time.
  fn open(&self, resource: &Resource) -> io::Result<ResourceReader<'_>>;
}

/// Resources stored as plain files beneath a root directory.
#[derive(Debug, Clone)]
pub struct BundleDir {
  root: PathBuf,
}

impl BundleDir {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// Host-native path of a resource inside the bundle.
  pub fn path_of(&self, resource: &Resource) -> PathBuf {
    resource
      .id
      .split('/')
      .filter(|part| !part.is_empty())
      .fold(self.root.clone(), |path, part| path.join(part))
  }
}

impl ResourceStore for BundleDir {
  fn open(&self, resource: &Resource) -> io::Result<ResourceReader<'_>> {
    let file = std::fs::File::open(self.path_of(resource))?;
    Ok(Box::new(tokio::fs::File::from_std(file)))
  }
}

/// Resources held in memory, keyed by resource id.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  entries: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, id: impl Into<String>, bytes: impl Into<Vec<u8>>) {
    self.entries.insert(id.into(), bytes.into());
  }

  pub fn with(mut self, id: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
    self.insert(id, bytes);
    self
  }
}

impl ResourceStore for MemoryStore {
  fn open(&self, resource: &Resource) -> io::Result<ResourceReader<'_>> {
    match self.entries.get(resource.id) {
      Some(bytes) => Ok(Box::new(bytes.as_slice())),
      None => Err(io::Error::new(
        io::ErrorKind::NotFound,
        format!("resource not bundled: {}", resource.id),
      )),
    }
  }
}
