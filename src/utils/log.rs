// src/utils/log.rs

//! Console output with server-style formatting.
//!
//! Progress lines and summaries for the batch commands. Output follows the
//! level configured on the `log` facade, so `--verbose` and `RUST_LOG`
//! apply here too.

use chrono::Local;
use ::log::Level;

/// Check if a log level should be displayed
fn should_log(level: Level) -> bool {
    level <= ::log::max_level()
}

/// Format a log message with timestamp and level
fn format_log(level: Level, message: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    format!("[{}] [{}] {}", timestamp, level.as_str(), message)
}

/// Log a debug message
pub fn debug(message: &str) {
    if should_log(Level::Debug) {
        eprintln!("{}", format_log(Level::Debug, message));
    }
}

/// Log an info message
pub fn info(message: &str) {
    if should_log(Level::Info) {
        println!("{}", format_log(Level::Info, message));
    }
}

/// Log a warning message
pub fn warn(message: &str) {
    if should_log(Level::Warn) {
        eprintln!("{}", format_log(Level::Warn, message));
    }
}

/// Log an error message
pub fn error(message: &str) {
    if should_log(Level::Error) {
        eprintln!("{}", format_log(Level::Error, message));
    }
}

/// Log a success message (always shown as INFO)
pub fn success(message: &str) {
    if should_log(Level::Info) {
        println!("{}", format_log(Level::Info, &format!("✓ {}", message)));
    }
}

/// Log a step in a process
pub fn step(step_num: usize, total: usize, message: &str) {
    if should_log(Level::Info) {
        let msg = format!("[STEP {}/{}] {}", step_num, total, message);
        println!("{}", format_log(Level::Info, &msg));
    }
}

/// Log a header
pub fn header(title: &str) {
    if should_log(Level::Info) {
        let border = "═".repeat(60);
        println!("{}", format_log(Level::Info, &border));
        println!("{}", format_log(Level::Info, &format!("  {}", title)));
        println!("{}", format_log(Level::Info, &border));
    }
}

/// Log a sub-item (indented)
pub fn sub_item(message: &str) {
    if should_log(Level::Info) {
        let msg = format!("    {}", message);
        println!("{}", format_log(Level::Info, &msg));
    }
}

/// Log a summary section
pub fn summary(title: &str, items: &[(&str, String)]) {
    if should_log(Level::Info) {
        println!();

        let title_msg = format!("[SUMMARY] {}", title);
        println!("{}", format_log(Level::Info, &title_msg));

        for (key, value) in items {
            let item_msg = format!("    {}: {}", key, value);
            println!("{}", format_log(Level::Info, &item_msg));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_log_contains_level_and_message() {
        let line = format_log(Level::Warn, "store unreachable");
        assert!(line.contains("[WARN]"));
        assert!(line.ends_with("store unreachable"));
    }

    #[test]
    fn test_level_ordering() {
        assert!(Level::Error < Level::Warn);
        assert!(Level::Info < Level::Debug);
    }
}
