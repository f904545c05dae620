mod cmd;
mod output;

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::{PackArgs, ToolArgs};
use output::{OutputFormat, print_error};

/// packpub - package deployment artifacts with bundled tools
#[derive(Parser)]
#[command(name = "packpub")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Materialize every bundled tool version and the packaging tool
  Extract {
    #[command(flatten)]
    tools: ToolArgs,
  },

  /// Run the pack build step
  Pack(PackArgs),

  /// List the bundled tool catalog
  Catalog,
}

fn init_tracing(verbose: bool) {
  let default = if verbose { "debug" } else { "packpub_lib=info,packpub=info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_ansi(std::io::stderr().is_terminal())
    .without_time()
    .init();
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let result = match &cli.command {
    Commands::Extract { tools } => cmd::cmd_extract(tools, cli.output),
    Commands::Pack(args) => cmd::cmd_pack(args, cli.output),
    Commands::Catalog => cmd::cmd_catalog(cli.output),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}
