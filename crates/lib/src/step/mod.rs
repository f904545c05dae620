//! The pack build step.
//!
//! Sequences one build step end to end:
//!
//! 1. `Preparing`: resolve the artifact set from the nuspec path rules.
//! 2. `ToolsReady`: materialize the packaging tool.
//! 3. `CommandBuilt`: build the `pack` command and log its masked rendering.
//! 4. `Executing`: run the real command, forwarding its output.
//!
//! Any error moves the step to `Failed` and is reported through the build
//! logger. Nothing is rolled back; a rerun skips tools that are already
//! materialized.
//!
//! Server arguments are off by default. With [`PackStep::with_publish`] the
//! server URL and API key parameters are appended to the command, the key as
//! a secret argument.

mod exec;
mod types;

use std::path::PathBuf;

use tracing::debug;

use crate::artifacts::ArtifactResolver;
use crate::command::{PackInputs, build_pack_command};
use crate::host::{BuildLogger, RunnerParameters};
use crate::materialize::Materializer;
use crate::resources::ResourceStore;

pub use exec::run_command;
pub use types::{StepDirs, StepError, StepOutcome, StepState};

/// Banner logged when the step starts.
pub const STEP_DESCRIPTION: &str = "Packing and publishing deployment packages to Octopus server";

pub struct PackStep<S, R, L> {
  materializer: Materializer<S>,
  resolver: R,
  logger: L,
  parameters: RunnerParameters,
  dirs: StepDirs,
  publish: bool,
  history: Vec<StepState>,
}

impl<S, R, L> PackStep<S, R, L>
where
  S: ResourceStore,
  R: ArtifactResolver,
  L: BuildLogger,
{
  pub fn new(
    materializer: Materializer<S>,
    resolver: R,
    logger: L,
    parameters: RunnerParameters,
    dirs: StepDirs,
  ) -> Self {
    Self {
      materializer,
      resolver,
      logger,
      parameters,
      dirs,
      publish: false,
      history: vec![StepState::NotStarted],
    }
  }

  /// Pass `--server` and `--apikey` from the runner parameters.
  pub fn with_publish(mut self, publish: bool) -> Self {
    self.publish = publish;
    self
  }

  pub fn state(&self) -> StepState {
    self.history.last().copied().unwrap_or(StepState::NotStarted)
  }

  /// Every state entered so far, starting with `NotStarted`.
  pub fn history(&self) -> &[StepState] {
    &self.history
  }

  /// Output directory passed to the packaging tool.
  ///
  /// A configured directory is resolved against the checkout directory;
  /// otherwise packages land in the tools root.
  pub fn output_dir(&self) -> PathBuf {
    match self.parameters.output_dir() {
      Some(dir) => self.dirs.checkout_dir.join(dir),
      None => self.dirs.tools_dir.clone(),
    }
  }

  /// Run the step to completion.
  pub async fn run(&mut self) -> Result<StepOutcome, StepError> {
    match self.execute().await {
      Ok(outcome) => {
        self.enter(StepState::Succeeded);
        self.logger.message("Packaging completed successfully");
        Ok(outcome)
      }
      Err(err) => {
        self.enter(StepState::Failed);
        self.logger.error(&err.to_string());
        Err(err)
      }
    }
  }

  async fn execute(&mut self) -> Result<StepOutcome, StepError> {
    self.logger.message(STEP_DESCRIPTION);

    self.enter(StepState::Preparing);
    let rules = self.parameters.nuspec_paths().unwrap_or_default().to_string();
    self.logger.message(&format!("nuspecPaths: {}", rules));
    let artifacts = self.resolver.resolve(&self.dirs.checkout_dir, &rules)?;
    if artifacts.is_empty() {
      self.logger.warning("No nuspec files matched the configured paths");
    }

    let tool = self
      .materializer
      .ensure_packaging_tool_extracted(&self.dirs.tools_dir)
      .await?;
    self.enter(StepState::ToolsReady);

    let output_dir = self.output_dir();
    let (server_url, api_key) = if self.publish {
      (self.parameters.server_url(), self.parameters.api_key())
    } else {
      (None, None)
    };
    let inputs = PackInputs::new(&artifacts, &output_dir)
      .package_version(self.parameters.package_version())
      .server(server_url, api_key.as_ref());
    let spec = build_pack_command(&tool.path, &inputs);
    let command = spec.masked_line();
    self.enter(StepState::CommandBuilt);

    self.logger.message(&command);
    self.enter(StepState::Executing);
    let exit_code = run_command(&spec, &self.logger).await?;

    Ok(StepOutcome {
      tool,
      artifacts,
      output_dir,
      command,
      exit_code,
    })
  }

  fn enter(&mut self, state: StepState) {
    debug!(from = ?self.state(), to = ?state, "pack step transition");
    self.history.push(state);
  }
}
