//! Implementation of the `packpub catalog` command.

use anyhow::Result;
use serde::Serialize;

use packpub_lib::catalog::{PACKAGING_TOOL, RELEASE_TOOLS, Resource, VersionedTool};

use crate::output::{Mark, OutputFormat, print_item, print_json, print_section, symbols};

#[derive(Serialize)]
struct Catalog {
  release_tools: &'static [VersionedTool],
  packaging_tool: Resource,
}

/// List every bundled resource and where it lands under the tools root.
pub fn cmd_catalog(output: OutputFormat) -> Result<()> {
  if output.is_json() {
    return print_json(&Catalog {
      release_tools: &RELEASE_TOOLS,
      packaging_tool: PACKAGING_TOOL,
    });
  }

  print_section("Release tools");
  for tool in &RELEASE_TOOLS {
    for resource in tool.resources() {
      let target = format!("{}/{}", tool.version, resource.file_name);
      print_item(Mark::Entry, &entry(resource, &target));
    }
  }

  print_section("Packaging tool");
  print_item(Mark::Entry, &entry(&PACKAGING_TOOL, PACKAGING_TOOL.file_name));

  Ok(())
}

fn entry(resource: &Resource, target: &str) -> String {
  format!("{} {} {}", resource.id, symbols::ARROW, target)
}
