//! Colored output helpers

use owo_colors::OwoColorize;

/// Print a warning message to stderr
pub fn warning(text: &str) {
    eprintln!("{} {}", "warning:".yellow().bold(), text);
}

/// Print an error message to stderr
pub fn error(text: &str) {
    eprintln!("{} {}", "error:".red().bold(), text);
}

/// Print a success message to stdout
pub fn success(text: &str) {
    println!("{} {}", "✓".green().bold(), text);
}

/// Print an informational message to stdout
pub fn info(text: &str) {
    println!("{}", text);
}
