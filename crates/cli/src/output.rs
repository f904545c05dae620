//! Terminal output for packpub commands.
//!
//! Text mode prints a status line, one indented line per item, then a block
//! of aligned stats, all on stdout. `--output json` prints a single document
//! instead. Errors always go to stderr.

use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const SKIPPED: &str = "·";
  pub const ARROW: &str = "→";
}

/// Leading mark of an item line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
  /// Something was written.
  Done,
  /// Nothing to do.
  Skipped,
  /// Plain listing entry.
  Entry,
}

const STAT_WIDTH: usize = 16;

/// `1536` -> `1.5 KiB`. Whole bytes below one KiB.
pub fn format_bytes(bytes: u64) -> String {
  const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

  if bytes < 1024 {
    return format!("{} B", bytes);
  }
  let mut value = bytes as f64 / 1024.0;
  let mut unit = 0;
  while value >= 1024.0 && unit < UNITS.len() - 1 {
    value /= 1024.0;
    unit += 1;
  }
  format!("{:.1} {}", value, UNITS[unit])
}

/// Elapsed time at millisecond precision, e.g. `1s 500ms`.
pub fn format_elapsed(elapsed: Duration) -> String {
  let millis = Duration::from_millis(elapsed.as_millis().try_into().unwrap_or(u64::MAX));
  if millis.is_zero() {
    return "0ms".to_string();
  }
  humantime::format_duration(millis).to_string()
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message.if_supports_color(Stream::Stdout, |s| s.bold())
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

/// Heading for a group of item lines.
pub fn print_section(title: &str) {
  println!("{}", title.if_supports_color(Stream::Stdout, |s| s.bold()));
}

pub fn print_item(mark: Mark, text: &str) {
  match mark {
    Mark::Done => println!(
      "  {} {}",
      symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
      text
    ),
    Mark::Skipped => println!(
      "  {} {}",
      symbols::SKIPPED.if_supports_color(Stream::Stdout, |s| s.dimmed()),
      text.if_supports_color(Stream::Stdout, |s| s.dimmed())
    ),
    Mark::Entry => println!("  {}", text),
  }
}

pub fn print_stat(label: &str, value: &str) {
  let label = format!("{:<width$}", format!("{}:", label), width = STAT_WIDTH);
  println!("  {} {}", label.if_supports_color(Stream::Stdout, |s| s.dimmed()), value);
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize report as JSON")?;
  println!("{}", json);
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bytes_use_binary_units() {
    assert_eq!(format_bytes(0), "0 B");
    assert_eq!(format_bytes(1023), "1023 B");
    assert_eq!(format_bytes(1536), "1.5 KiB");
    assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MiB");
    assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.0 GiB");
  }

  #[test]
  fn elapsed_is_truncated_to_millis() {
    assert_eq!(format_elapsed(Duration::ZERO), "0ms");
    assert_eq!(format_elapsed(Duration::from_micros(1_500_900)), "1s 500ms");
    assert_eq!(format_elapsed(Duration::from_secs(65)), "1m 5s");
  }
}
