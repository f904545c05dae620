//! Argument construction for the packaging tool's `pack` subcommand.

use std::path::Path;

use crate::artifacts::ArtifactFile;

use super::{CommandSpec, Secret};

const PACK: &str = "pack";
const NO_PACKAGE_ANALYSIS: &str = "-NoPackageAnalysis";
const VERSION: &str = "-Version";
const OUTPUT_DIRECTORY: &str = "-OutputDirectory";
const SERVER: &str = "--server";
const API_KEY: &str = "--apikey";

/// Inputs to [`build_pack_command`].
#[derive(Debug, Clone, Copy)]
pub struct PackInputs<'a> {
  /// Package manifests, passed positionally in this order.
  pub artifacts: &'a [ArtifactFile],
  /// Omitted when absent, empty, or whitespace only.
  pub package_version: Option<&'a str>,
  pub output_dir: &'a Path,
  pub server_url: Option<&'a str>,
  pub api_key: Option<&'a Secret>,
}

impl<'a> PackInputs<'a> {
  pub fn new(artifacts: &'a [ArtifactFile], output_dir: &'a Path) -> Self {
    Self {
      artifacts,
      package_version: None,
      output_dir,
      server_url: None,
      api_key: None,
    }
  }

  pub fn package_version(mut self, version: Option<&'a str>) -> Self {
    self.package_version = version;
    self
  }

  pub fn server(mut self, url: Option<&'a str>, api_key: Option<&'a Secret>) -> Self {
    self.server_url = url;
    self.api_key = api_key;
    self
  }
}

/// Build the `pack` invocation of the packaging tool at `tool`.
///
/// Produces, in order: `pack`, each artifact's absolute source path,
/// `-NoPackageAnalysis`, `-Version <v>` (if given), `-OutputDirectory <dir>`,
/// then `--server <url>` and `--apikey <key>` when supplied. The key is the
/// only argument recorded as secret.
pub fn build_pack_command(tool: &Path, inputs: &PackInputs<'_>) -> CommandSpec {
  let mut spec = CommandSpec::new(tool);
  spec.arg(PACK);

  for artifact in inputs.artifacts {
    spec.arg(artifact.source_path.display().to_string());
  }

  spec.arg(NO_PACKAGE_ANALYSIS);

  if let Some(version) = inputs.package_version.filter(|v| !v.trim().is_empty()) {
    spec.arg(VERSION).arg(version);
  }

  spec.arg(OUTPUT_DIRECTORY).arg(inputs.output_dir.display().to_string());

  if let Some(url) = inputs.server_url {
    spec.arg(SERVER).arg(url);
  }
  if let Some(key) = inputs.api_key {
    spec.arg(API_KEY).secret_arg(key);
  }

  spec
}
