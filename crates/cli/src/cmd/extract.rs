//! Implementation of the `packpub extract` command.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;

use packpub_lib::materialize::Extraction;

use super::{ToolArgs, runtime};
use crate::output::{Mark, OutputFormat, format_bytes, format_elapsed, print_item, print_json, print_stat, print_success};

#[derive(Serialize)]
struct ExtractReport {
  tools_dir: PathBuf,
  extractions: Vec<Extraction>,
}

/// Materialize every release tool version plus the packaging tool.
///
/// Already-present files are left untouched, so running this repeatedly is
/// cheap.
pub fn cmd_extract(tools: &ToolArgs, output: OutputFormat) -> Result<()> {
  let start = Instant::now();
  let tools_dir = tools.tools_dir();
  let materializer = tools.materializer()?;

  let rt = runtime()?;
  let extractions = rt
    .block_on(async {
      let mut extractions = materializer.ensure_tools_extracted(&tools_dir).await?;
      extractions.push(materializer.ensure_packaging_tool_extracted(&tools_dir).await?);
      Ok::<_, packpub_lib::materialize::MaterializeError>(extractions)
    })
    .context("Extraction failed")?;

  if output.is_json() {
    return print_json(&ExtractReport { tools_dir, extractions });
  }

  let written: Vec<_> = extractions.iter().filter(|e| e.was_written()).collect();
  let bytes: u64 = written.iter().map(|e| e.bytes).sum();
  let retried = extractions.iter().filter(|e| e.attempts > 1).count();

  println!();
  print_success("Tools ready");
  for extraction in &extractions {
    let shown = extraction.path.strip_prefix(&tools_dir).unwrap_or(extraction.path.as_path());
    if extraction.was_written() {
      print_item(Mark::Done, &format!("{} ({})", shown.display(), format_bytes(extraction.bytes)));
    } else {
      print_item(Mark::Skipped, &format!("{} already present", shown.display()));
    }
  }
  println!();
  print_stat("Location", &tools_dir.display().to_string());
  print_stat("Extracted", &written.len().to_string());
  print_stat("Already present", &(extractions.len() - written.len()).to_string());
  if retried > 0 {
    print_stat("Retried", &retried.to_string());
  }
  print_stat("Written", &format_bytes(bytes));
  print_stat("Duration", &format_elapsed(start.elapsed()));

  Ok(())
}
