//! External command specifications.
//!
//! A [`CommandSpec`] holds one argument list plus the indices of the
//! arguments that carry secrets. Both the real and the masked views are
//! rendered from that single list by [`CommandSpec::render`], which is the
//! only way arguments leave a spec.

pub mod pack;

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::consts::REDACTED;

pub use pack::{PackInputs, build_pack_command};

/// A secret string. Formats as the redaction token.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
  pub fn new(value: impl Into<String>) -> Self {
    Self(value.into())
  }

  /// The raw value. Only for handing to the process being spawned.
  pub fn expose(&self) -> &str {
    &self.0
  }
}

impl fmt::Debug for Secret {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Secret({})", REDACTED)
  }
}

impl fmt::Display for Secret {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(REDACTED)
  }
}

/// Program, ordered arguments, and which arguments are secret.
#[derive(Clone, PartialEq, Eq)]
pub struct CommandSpec {
  program: PathBuf,
  args: Vec<String>,
  secret_indices: BTreeSet<usize>,
}

impl CommandSpec {
  pub fn new(program: impl Into<PathBuf>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      secret_indices: BTreeSet::new(),
    }
  }

  pub fn arg(&mut self, arg: impl Into<String>) -> &mut Self {
    self.args.push(arg.into());
    self
  }

  /// Append a secret argument, recording its index for redaction.
  pub fn secret_arg(&mut self, secret: &Secret) -> &mut Self {
    self.secret_indices.insert(self.args.len());
    self.args.push(secret.expose().to_string());
    self
  }

  pub fn program(&self) -> &Path {
    &self.program
  }

  pub fn secret_indices(&self) -> &BTreeSet<usize> {
    &self.secret_indices
  }

  /// Render the argument list.
  ///
  /// With `masked`, every secret index is replaced by the redaction token and
  /// all other positions are returned untouched.
  pub fn render(&self, masked: bool) -> Vec<String> {
    if !masked {
      return self.args.clone();
    }
    self
      .args
      .iter()
      .enumerate()
      .map(|(index, arg)| {
        if self.secret_indices.contains(&index) {
          REDACTED.to_string()
        } else {
          arg.clone()
        }
      })
      .collect()
  }

  /// Masked, shell-like command line for logs and error messages.
  pub fn masked_line(&self) -> String {
    std::iter::once(self.program.display().to_string())
      .chain(self.render(true))
      .map(|part| quote(&part))
      .collect::<Vec<_>>()
      .join(" ")
  }

  /// A process builder carrying the real arguments.
  pub fn to_command(&self) -> tokio::process::Command {
    let mut command = tokio::process::Command::new(&self.program);
    command.args(self.render(false));
    command
  }
}

impl fmt::Debug for CommandSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CommandSpec")
      .field("program", &self.program)
      .field("args", &self.render(true))
      .field("secret_indices", &self.secret_indices)
      .finish()
  }
}

fn quote(part: &str) -> String {
  if part.is_empty() || part.chars().any(char::is_whitespace) {
    format!("\"{}\"", part.replace('"', "\\\""))
  } else {
    part.to_string()
  }
}
