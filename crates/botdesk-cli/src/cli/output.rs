//! Shared terminal output helpers for command handlers.

use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Start a steady-ticking spinner. `color` is an indicatif style color
/// such as `cyan` or `red`.
pub fn spinner(message: impl Into<String>, color: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let template = format!("{{spinner:.{color}}} {{msg}}");
    spinner.set_style(
        ProgressStyle::with_template(&template).unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

pub fn success(message: impl std::fmt::Display) {
    println!();
    println!("  {} {}", style("✓").green().bold(), message);
}

pub fn info(message: impl std::fmt::Display) {
    println!();
    println!("  {} {}", style("i").blue().bold(), message);
}

pub fn warning(message: impl std::fmt::Display) {
    println!("  {} {}", style("!").yellow().bold(), message);
}

/// One-line failure notice on stderr.
pub fn failure(message: impl std::fmt::Display) {
    eprintln!();
    eprintln!("  {} {}", style("✗").red().bold(), message);
    eprintln!();
}

/// Timestamps are shown in local time, minute precision.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Shorten `text` to at most `max` characters, marking the cut with `...`.
pub fn truncate(text: &str, max: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
