//! Validation reporter

use std::fmt::Write;

/// Formats collected messages into one caller-facing summary
pub struct ValidationReporter;

impl ValidationReporter {
    /// `"Found <n> error(s) in <subject>:"` followed by one numbered line per message
    #[must_use]
    pub fn summarize(subject: &str, errors: &[String]) -> String {
        let mut message = format!("Found {} error(s) in {subject}:", errors.len());
        for (idx, error) in errors.iter().enumerate() {
            let _ = write!(message, "\n  {}. {error}", idx + 1);
        }
        message
    }
}
