//! Progress indicators for CLI mode
//!
//! This module provides progress display using indicatif and console.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a simple spinner for indeterminate operations
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(template);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Print a pass status
pub fn print_pass(message: &str) {
    println!("  {} {}", style("✓").green(), message);
}

/// Print a fail status
pub fn print_fail(message: &str) {
    println!("  {} {}", style("✗").red(), message);
}

/// Print a warning status
pub fn print_warning(message: &str) {
    println!("  {} {}", style("⚠").yellow(), message);
}

/// Print an info status
pub fn print_info(message: &str) {
    println!("  {} {}", style("ℹ").cyan(), message);
}
