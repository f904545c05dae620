use std::path::PathBuf;

use crate::consts::APP_NAME;

/// Overrides the destination root for materialized tools.
pub const TOOLS_DIR_ENV: &str = "PACKPUB_TOOLS_DIR";

/// Overrides the directory holding the bundled resources.
pub const BUNDLE_DIR_ENV: &str = "PACKPUB_BUNDLE_DIR";

fn env_path(name: &str) -> Option<PathBuf> {
  std::env::var_os(name).filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// Returns the user's home directory, or the temp directory if unknown.
#[cfg(windows)]
pub fn home_dir() -> PathBuf {
  env_path("USERPROFILE").unwrap_or_else(std::env::temp_dir)
}

/// Returns the user's home directory, or the temp directory if unknown.
#[cfg(not(windows))]
pub fn home_dir() -> PathBuf {
  env_path("HOME").unwrap_or_else(std::env::temp_dir)
}

/// Returns the directory for cache files for the application
#[cfg(windows)]
pub fn cache_dir() -> PathBuf {
  env_path("LOCALAPPDATA")
    .unwrap_or_else(|| home_dir().join("AppData").join("Local"))
    .join(APP_NAME)
    .join("Cache")
}

/// Returns the directory for cache files for the application
#[cfg(not(windows))]
pub fn cache_dir() -> PathBuf {
  env_path("XDG_CACHE_HOME")
    .unwrap_or_else(|| home_dir().join(".cache"))
    .join(APP_NAME)
}

/// Destination root for materialized tools.
///
/// `PACKPUB_TOOLS_DIR` if set, otherwise `<cache_dir>/tools`.
pub fn tools_dir() -> PathBuf {
  env_path(TOOLS_DIR_ENV).unwrap_or_else(|| cache_dir().join("tools"))
}

/// Directory holding bundled resources.
///
/// `PACKPUB_BUNDLE_DIR` if set, otherwise `resources/` next to the running
/// executable.
pub fn bundle_dir() -> Option<PathBuf> {
  env_path(BUNDLE_DIR_ENV).or_else(|| {
    std::env::current_exe()
      .ok()
      .and_then(|exe| exe.parent().map(|dir| dir.join("resources")))
  })
}
