//! Implementation of the `packpub pack` command.
//!
//! Stands in for the host build runtime: collects runner parameters from the
//! command line, then runs the pack step with a tracing-backed build log.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;

use packpub_lib::artifacts::GlobResolver;
use packpub_lib::host::{RunnerParameters, TracingLogger};
use packpub_lib::step::{PackStep, StepDirs};

use super::{ToolArgs, runtime};
use crate::output::{OutputFormat, format_elapsed, print_json, print_stat, print_success};

#[derive(Debug, Clone, Args)]
pub struct PackArgs {
  #[command(flatten)]
  pub tools: ToolArgs,

  /// Base directory for nuspec path rules
  #[arg(long, default_value = ".")]
  pub checkout_dir: PathBuf,

  /// Runner parameter as KEY=VALUE (repeatable, overrides --params)
  #[arg(short = 'p', long = "param", value_name = "KEY=VALUE")]
  pub param: Vec<String>,

  /// JSON file with runner parameters
  #[arg(long = "params", value_name = "FILE")]
  pub params_file: Option<PathBuf>,

  /// Pass octopus_host and secure:octopus_apikey to the tool as --server/--apikey
  #[arg(long)]
  pub publish: bool,
}

impl PackArgs {
  fn parameters(&self) -> Result<RunnerParameters> {
    let mut parameters = match &self.params_file {
      Some(path) => RunnerParameters::from_json_file(path)?,
      None => RunnerParameters::new(),
    };
    for assignment in &self.param {
      let (key, value) = RunnerParameters::parse_assignment(assignment)?;
      parameters.insert(key, value);
    }
    Ok(parameters)
  }
}

/// Run the pack build step.
pub fn cmd_pack(args: &PackArgs, output: OutputFormat) -> Result<()> {
  let start = Instant::now();
  let parameters = args.parameters()?;
  let checkout_dir = dunce::canonicalize(&args.checkout_dir)
    .with_context(|| format!("Checkout directory not found: {}", args.checkout_dir.display()))?;

  let dirs = StepDirs {
    checkout_dir,
    tools_dir: args.tools.tools_dir(),
  };
  let mut step = PackStep::new(args.tools.materializer()?, GlobResolver, TracingLogger, parameters, dirs)
    .with_publish(args.publish);

  let rt = runtime()?;
  let outcome = rt.block_on(step.run()).context("Pack step failed")?;

  if output.is_json() {
    return print_json(&outcome);
  }

  println!();
  print_success("Pack step succeeded");
  print_stat("Artifacts", &outcome.artifacts.len().to_string());
  print_stat("Output", &outcome.output_dir.display().to_string());
  print_stat("Duration", &format_elapsed(start.elapsed()));

  Ok(())
}
