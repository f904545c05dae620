//! External process execution.

use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::debug;

use crate::command::CommandSpec;
use crate::consts::REDACTED;
use crate::host::BuildLogger;

use super::types::StepError;

/// Run `spec` with its real arguments and wait for it to exit.
///
/// Stdout lines go to the logger as messages, stderr lines as warnings. Any
/// secret argument value appearing in that output is replaced by the
/// redaction token. Returns the exit code on success.
pub async fn run_command(spec: &CommandSpec, logger: &impl BuildLogger) -> Result<i32, StepError> {
  let masked = spec.masked_line();
  let real = spec.render(false);
  let secrets: Vec<String> = spec
    .secret_indices()
    .iter()
    .filter_map(|&index| real.get(index))
    .filter(|value| !value.is_empty())
    .cloned()
    .collect();

  let mut command = spec.to_command();
  command
    .stdin(Stdio::null())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .kill_on_drop(true);

  debug!(command = %masked, "spawning process");

  let mut child = command.spawn().map_err(|source| StepError::Spawn {
    command: masked.clone(),
    source,
  })?;

  let stdout = child.stdout.take();
  let stderr = child.stderr.take();

  let (out, err, status) = tokio::join!(
    forward(stdout, &secrets, |line| logger.message(line)),
    forward(stderr, &secrets, |line| logger.warning(line)),
    child.wait(),
  );

  let io_error = |source| StepError::Io {
    command: masked.clone(),
    source,
  };
  out.map_err(io_error)?;
  err.map_err(io_error)?;
  let status = status.map_err(io_error)?;

  match status.code() {
    Some(0) => Ok(0),
    code => Err(StepError::CommandFailed { command: masked, code }),
  }
}

async fn forward<R: AsyncRead + Unpin>(
  reader: Option<R>,
  secrets: &[String],
  mut sink: impl FnMut(&str),
) -> std::io::Result<()> {
  let Some(reader) = reader else {
    return Ok(());
  };

  // Tool output is not guaranteed to be UTF-8.
  let mut reader = BufReader::new(reader);
  let mut buf = Vec::new();
  loop {
    buf.clear();
    if reader.read_until(b'\n', &mut buf).await? == 0 {
      return Ok(());
    }
    let line = String::from_utf8_lossy(&buf);
    let line = line.trim_end_matches(['\n', '\r']).to_string();
    sink(&scrub(line, secrets));
  }
}

fn scrub(mut line: String, secrets: &[String]) -> String {
  for secret in secrets {
    if line.contains(secret.as_str()) {
      line = line.replace(secret.as_str(), REDACTED);
    }
  }
  line
}
