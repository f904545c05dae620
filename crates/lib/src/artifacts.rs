//! Artifact set resolution.
//!
//! Turns artifact path rules into the concrete list of files to package.
//! Rules are separated by newlines or commas:
//!
//! ```text
//! src/**/*.nuspec
//! build/Deploy.nuspec => deploy
//! -:src/**/obj/**
//! ```
//!
//! A rule is a glob relative to the base directory (or absolute), optionally
//! followed by `=> target` naming the archive directory. Rules prefixed with
//! `-:` exclude matches of the other rules; a `+:` prefix is accepted and
//! ignored.

use std::collections::HashSet;
use std::io;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use glob::{MatchOptions, Pattern};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// One file selected for packaging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactFile {
  /// Absolute path of the file on disk.
  pub source_path: PathBuf,
  /// `/`-separated path of the file inside the produced archive.
  pub archive_path: String,
}

#[derive(Debug, Error)]
pub enum ArtifactError {
  #[error("base directory does not exist: {}", .0.display())]
  NoBaseDir(PathBuf),

  #[error("invalid artifact pattern '{pattern}': {message}")]
  InvalidPattern { pattern: String, message: String },

  #[error("failed to read {}: {source}", .path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Resolves artifact path rules against a base directory.
pub trait ArtifactResolver {
  fn resolve(&self, base_dir: &Path, rules: &str) -> Result<Vec<ArtifactFile>, ArtifactError>;
}

/// A parsed artifact path rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRule {
  pub pattern: String,
  pub target: Option<String>,
  pub exclude: bool,
}

/// Split a rules string into rules, skipping blank entries.
pub fn parse_rules(rules: &str) -> Vec<PathRule> {
  rules
    .split(['\n', '\r', ','])
    .map(str::trim)
    .filter(|line| !line.is_empty())
    .map(|line| {
      let (exclude, line) = if let Some(rest) = line.strip_prefix("-:") {
        (true, rest)
      } else {
        (false, line.strip_prefix("+:").unwrap_or(line))
      };

      let (pattern, target) = match line.split_once("=>") {
        Some((pattern, target)) => {
          let target = target.trim().trim_matches(|c| c == '/' || c == '\\');
          (pattern.trim(), (!target.is_empty()).then(|| target.replace('\\', "/")))
        }
        None => (line.trim(), None),
      };

      PathRule {
        pattern: pattern.to_string(),
        target,
        exclude,
      }
    })
    .collect()
}

/// Filesystem resolver backed by `glob`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobResolver;

impl GlobResolver {
  /// Relative rules are anchored at `base_dir`, whose own characters are
  /// matched literally.
  fn full_pattern(base_dir: &Path, pattern: &str) -> String {
    if Path::new(pattern).is_absolute() {
      return pattern.to_string();
    }
    let mut full = Pattern::escape(&base_dir.to_string_lossy());
    if !full.ends_with(MAIN_SEPARATOR) {
      full.push(MAIN_SEPARATOR);
    }
    full.push_str(pattern);
    full
  }

  fn compile(base_dir: &Path, rule: &PathRule) -> Result<Pattern, ArtifactError> {
    Pattern::new(&Self::full_pattern(base_dir, &rule.pattern)).map_err(|e| ArtifactError::InvalidPattern {
      pattern: rule.pattern.clone(),
      message: e.to_string(),
    })
  }
}

impl ArtifactResolver for GlobResolver {
  fn resolve(&self, base_dir: &Path, rules: &str) -> Result<Vec<ArtifactFile>, ArtifactError> {
    if !base_dir.is_dir() {
      return Err(ArtifactError::NoBaseDir(base_dir.to_path_buf()));
    }
    let base_dir = dunce::canonicalize(base_dir).map_err(|source| ArtifactError::Io {
      path: base_dir.to_path_buf(),
      source,
    })?;

    let rules = parse_rules(rules);
    let excludes = rules
      .iter()
      .filter(|rule| rule.exclude)
      .map(|rule| Self::compile(&base_dir, rule))
      .collect::<Result<Vec<_>, _>>()?;

    let options = MatchOptions::new();
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for rule in rules.iter().filter(|rule| !rule.exclude) {
      let full = Self::full_pattern(&base_dir, &rule.pattern);
      let paths = glob::glob_with(&full, options).map_err(|e| ArtifactError::InvalidPattern {
        pattern: rule.pattern.clone(),
        message: e.to_string(),
      })?;

      let mut matched = 0usize;
      for entry in paths {
        let path = entry.map_err(|e| ArtifactError::Io {
          path: e.path().to_path_buf(),
          source: e.into_error(),
        })?;
        if !path.is_file() || excludes.iter().any(|ex| ex.matches_path_with(&path, options)) {
          continue;
        }

        let source_path = dunce::canonicalize(&path).map_err(|source| ArtifactError::Io {
          path: path.clone(),
          source,
        })?;
        matched += 1;
        if !seen.insert(source_path.clone()) {
          continue;
        }

        let archive_path = archive_path(&base_dir, &source_path, rule.target.as_deref());
        debug!(source = ?source_path, archive = %archive_path, "artifact matched");
        files.push(ArtifactFile {
          source_path,
          archive_path,
        });
      }

      if matched == 0 {
        warn!(pattern = %rule.pattern, "artifact rule matched no files");
      }
    }

    Ok(files)
  }
}

fn archive_path(base_dir: &Path, source: &Path, target: Option<&str>) -> String {
  let file_name = source
    .file_name()
    .map(|n| n.to_string_lossy().to_string())
    .unwrap_or_default();

  match target {
    Some(target) => format!("{}/{}", target, file_name),
    None => match source.strip_prefix(base_dir) {
      Ok(relative) => relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/"),
      Err(_) => file_name,
    },
  }
}
