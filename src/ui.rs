use colored::{ColoredString, Colorize};
use driftkit::{DriftStatus, Severity};
use serde_json::Value;

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a section header
pub fn section(title: &str) {
    println!();
    println!("{}", title.cyan().bold());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

// ============================================================================
// Drift Rendering
// ============================================================================

/// Diff-style symbol for a status
pub fn status_symbol(status: DriftStatus) -> ColoredString {
    match status {
        DriftStatus::Synced => "✓".green(),
        DriftStatus::Modified => "~".yellow(),
        DriftStatus::Missing => "-".red(),
        DriftStatus::Added => "+".blue(),
    }
}

/// Status tag colored like its symbol
pub fn status_label(status: DriftStatus) -> ColoredString {
    match status {
        DriftStatus::Synced => status.as_str().green(),
        DriftStatus::Modified => status.as_str().yellow(),
        DriftStatus::Missing => status.as_str().red(),
        DriftStatus::Added => status.as_str().blue(),
    }
}

/// Score with its severity band, colored
pub fn score_label(score: u8) -> ColoredString {
    let text = format!("{score}/100 ({})", Severity::from_score(score));
    match Severity::from_score(score) {
        Severity::Critical => text.red().bold(),
        Severity::Warning => text.yellow().bold(),
        Severity::Healthy => text.green().bold(),
    }
}

/// Fixed-width bar for a 0-100 score
pub fn score_bar(score: u8, width: usize) -> String {
    let filled = (usize::from(score.min(100)) * width + 50) / 100;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}

/// Compact single-line rendering of a config value
pub fn format_value(value: Option<&Value>) -> String {
    match value {
        None => "(not set)".to_string(),
        Some(Value::String(s)) => format!("\"{s}\""),
        Some(other) => other.to_string(),
    }
}

/// Truncate a string for display, keeping the start
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else if max_len <= 3 {
        "...".to_string()
    } else {
        let kept: String = text.chars().take(max_len - 3).collect();
        format!("{kept}...")
    }
}

// ============================================================================
// Tests
// ============================================================================
