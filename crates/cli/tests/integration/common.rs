//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Stand-in packaging tool: prints each argument on its own line.
pub const ECHO_TOOL: &str = "#!/bin/sh\nfor a in \"$@\"; do echo \"arg: $a\"; done\n";

/// Stand-in packaging tool that always fails.
pub const FAILING_TOOL: &str = "#!/bin/sh\necho 'pack failed' >&2\nexit 4\n";

/// Isolated test environment.
///
/// Each test gets its own bundle, tools, and checkout directories.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    let env = Self {
      temp: TempDir::new().unwrap(),
    };
    std::fs::create_dir_all(env.checkout_path()).unwrap();
    env
  }

  /// Create a bundle holding every catalog resource.
  pub fn with_full_bundle(self, packaging_tool: &str) -> Self {
    for version in ["1", "2", "3"] {
      let exe = if version == "1" { "octo.exe" } else { "Octo.exe" };
      self.write_bundle(&format!("resources/{version}/0/{exe}"), "octo binary");
      self.write_bundle(&format!("resources/{version}/0/Octo.exe.config"), "<configuration/>");
    }
    self.write_bundle("resources/nuget.exe", packaging_tool);
    self
  }

  pub fn write_bundle(&self, relative: &str, content: &str) {
    write(&self.bundle_path().join(relative), content);
  }

  pub fn write_checkout(&self, relative: &str, content: &str) {
    write(&self.checkout_path().join(relative), content);
  }

  pub fn bundle_path(&self) -> PathBuf {
    self.temp.path().join("bundle")
  }

  pub fn tools_path(&self) -> PathBuf {
    self.temp.path().join("tools")
  }

  pub fn checkout_path(&self) -> PathBuf {
    self.temp.path().join("checkout")
  }

  /// A packpub command bound to this environment's directories.
  pub fn cmd(&self, subcommand: &str) -> Command {
    let mut cmd = cargo_bin_cmd!("packpub");
    cmd
      .arg(subcommand)
      .arg("--bundle-dir")
      .arg(self.bundle_path())
      .arg("--tools-dir")
      .arg(self.tools_path())
      .args(["--retry-backoff", "0s"])
      .env_remove("RUST_LOG");
    cmd
  }
}

fn write(path: &Path, content: &str) {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).unwrap();
  }
  std::fs::write(path, content).unwrap();
}
