//! Shared helper functions for CLI commands

use console::style;
use serde_json::Value;

/// Truncate a string to max_len, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Compact display of a default value for field tables
pub fn format_default(value: Option<&Value>) -> String {
    match value {
        None => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Pluralized count, e.g. "1 file" / "3 files"
pub fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", n, noun)
    }
}

pub fn mark_ok() -> String {
    style("✓").green().to_string()
}

pub fn mark_failed() -> String {
    style("✗").red().to_string()
}

pub fn mark_warning() -> String {
    style("!").yellow().to_string()
}

pub fn mark_skipped() -> String {
    style("?").yellow().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
        assert_eq!(truncate_str("ünïcødé text", 7), "ünïc...");
    }

    #[test]
    fn test_format_default() {
        assert_eq!(format_default(None), "");
        assert_eq!(format_default(Some(&serde_json::json!("transactional"))), "transactional");
        assert_eq!(format_default(Some(&serde_json::json!([]))), "[]");
    }

    #[test]
    fn test_count() {
        assert_eq!(count(1, "file"), "1 file");
        assert_eq!(count(0, "error"), "0 errors");
    }
}
