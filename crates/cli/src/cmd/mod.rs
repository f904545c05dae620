mod catalog;
mod extract;
mod pack;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use packpub_lib::materialize::{Materializer, RetryPolicy};
use packpub_lib::platform::paths;
use packpub_lib::resources::BundleDir;

pub use catalog::cmd_catalog;
pub use extract::cmd_extract;
pub use pack::{PackArgs, cmd_pack};

/// Where tools come from and where they are materialized.
#[derive(Debug, Clone, Args)]
pub struct ToolArgs {
  /// Destination root for materialized tools [env: PACKPUB_TOOLS_DIR]
  #[arg(long)]
  pub tools_dir: Option<PathBuf>,

  /// Directory holding the bundled resources [env: PACKPUB_BUNDLE_DIR]
  #[arg(long)]
  pub bundle_dir: Option<PathBuf>,

  /// Wait between extraction attempts (e.g. "4s", "500ms")
  #[arg(long, value_parser = humantime::parse_duration, default_value = "4s")]
  pub retry_backoff: Duration,
}

impl ToolArgs {
  pub fn tools_dir(&self) -> PathBuf {
    self.tools_dir.clone().unwrap_or_else(paths::tools_dir)
  }

  pub fn materializer(&self) -> Result<Materializer<BundleDir>> {
    let bundle = self
      .bundle_dir
      .clone()
      .or_else(paths::bundle_dir)
      .context("Could not determine the bundle directory; pass --bundle-dir")?;

    let policy = RetryPolicy {
      backoff: self.retry_backoff,
      ..RetryPolicy::default()
    };
    Ok(Materializer::new(BundleDir::new(bundle)).with_policy(policy))
  }
}

pub(crate) fn runtime() -> Result<tokio::runtime::Runtime> {
  tokio::runtime::Runtime::new().context("Failed to create async runtime")
}
