use bentley::*;
use colored::Color;

#[test]
fn test_basic_logging_functions() {
  // Test that basic logging functions can be called without panicking
  info("Test info message");
  error("Test error message");
  success("Test success message");
}

#[test]
fn test_multiline_messages() {
  let multiline_msg = "First line\nSecond line\nThird line";
  info(multiline_msg);
  error(multiline_msg);
}

#[test]
fn test_prefixed_lines() {
  colored::control::set_override(false);

  assert_eq!(prefixed(Color::Red, "error", "boom"), vec!["[error] boom"]);
  assert_eq!(prefixed(Color::Blue, "info", "a\nb"), vec!["[info]  a", "[info]  b"]);
  assert!(prefixed(Color::Green, "sccs", "").is_empty());
}

#[test]
fn test_banner_line() {
  assert_eq!(banner_line(5, '='), "=====");
  assert_eq!(banner_line(0, '-'), "");
}
