//! Fixed catalog of bundled tools.
//!
//! Three versions of the deployment-release tool (each an executable plus its
//! `.config` companion) and the auxiliary packaging tool. Resource ids are the
//! paths under which the bundle stores each file; destinations use the
//! `file_name` under the version directory.

use serde::Serialize;

/// One bundled file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resource {
  /// Bundle-relative id, always `/`-separated.
  pub id: &'static str,
  /// File name written at the destination.
  pub file_name: &'static str,
  /// Whether the materialized file should be marked executable.
  pub executable: bool,
}

/// A versioned release tool: materialized into `<root>/<version>/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VersionedTool {
  pub version: &'static str,
  pub executable: Resource,
  pub config: Option<Resource>,
}

impl VersionedTool {
  /// All resources of this tool, executable first.
  pub fn resources(&self) -> impl Iterator<Item = &Resource> {
    std::iter::once(&self.executable).chain(self.config.iter())
  }
}

const fn exe(id: &'static str) -> Resource {
  Resource {
    id,
    file_name: "Octo.exe",
    executable: true,
  }
}

const fn exe_config(id: &'static str) -> Resource {
  Resource {
    id,
    file_name: "Octo.exe.config",
    executable: false,
  }
}

/// Release tool versions, in extraction order.
pub static RELEASE_TOOLS: [VersionedTool; 3] = [
  VersionedTool {
    version: "1.0",
    executable: exe("resources/1/0/octo.exe"),
    config: Some(exe_config("resources/1/0/Octo.exe.config")),
  },
  VersionedTool {
    version: "2.0",
    executable: exe("resources/2/0/Octo.exe"),
    config: Some(exe_config("resources/2/0/Octo.exe.config")),
  },
  VersionedTool {
    version: "3.0",
    executable: exe("resources/3/0/Octo.exe"),
    config: Some(exe_config("resources/3/0/Octo.exe.config")),
  },
];

/// The packaging tool, materialized directly under the destination root.
pub static PACKAGING_TOOL: Resource = Resource {
  id: "resources/nuget.exe",
  file_name: "nuget.exe",
  executable: true,
};

/// Every resource in the catalog, release tools first.
pub fn all_resources() -> impl Iterator<Item = &'static Resource> {
  RELEASE_TOOLS
    .iter()
    .flat_map(|tool| tool.resources())
    .chain(std::iter::once(&PACKAGING_TOOL))
}
