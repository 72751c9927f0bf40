//! ## Features
//!
//! - Status levels (info, error, success) with colored prefixes
//! - Multi-line message support, one prefix per line
//! - Banner lines for framing report output
//! - All status output goes to stderr, leaving stdout to the report itself
//!
//! ## Usage
//!
//! Functions: `info()`, `error()`, `success()`
//!
//! Macros of the same names mark call sites as excluded from coverage.

use colored::*;

/// Format a colored prefix for log messages
fn format_prefix(color: Color, prefix: &str) -> String {
  let padding = 7usize.saturating_sub(prefix.len() + 2);
  format!("[{}]{:<width$}", prefix.color(color).bold(), "", width = padding)
}

/// Prefix every line of `message`
pub fn prefixed(color: Color, prefix: &str, message: &str) -> Vec<String> {
  let prefix = format_prefix(color, prefix);
  message.lines().map(|line| format!("{prefix} {line}")).collect()
}

/// Create a banner line of the specified length and character
pub fn banner_line(length: usize, char: char) -> String {
  char.to_string().repeat(length)
}

fn emit(color: Color, prefix: &str, message: &str) {
  for line in prefixed(color, prefix, message) {
    eprintln!("{line}");
  }
}

/// Info level logging - general information
pub fn info(message: &str) {
  emit(Color::Blue, "info", message);
}

/// Error level logging - something went wrong
pub fn error(message: &str) {
  emit(Color::Red, "error", message);
}

/// Success level logging - something completed successfully
pub fn success(message: &str) {
  emit(Color::Green, "sccs", message);
}

/// Macros for coverage-excluded logging - these expand with LCOV_EXCL_LINE at call sites
#[macro_export]
macro_rules! info {
  ($msg:expr) => {
    $crate::info($msg); // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! error {
  ($msg:expr) => {
    $crate::error($msg); // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! success {
  ($msg:expr) => {
    $crate::success($msg); // LCOV_EXCL_LINE
  };
}
