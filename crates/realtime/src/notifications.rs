//! Notification payloads produced by the transition classifier.
//!
//! A [`NotableTransition`] is derived per change event and never stored; it is
//! the only thing the engine ever hands to the notification sink.

use serde::{Deserialize, Serialize};

/// Visual weight of a notification, mirroring the dashboard's toast variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Destructive,
}

/// A classifier-approved, user-facing summary of a state change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotableTransition {
    pub title: String,
    pub body: String,
    pub severity: Severity,
}

impl NotableTransition {
    pub fn new(title: impl Into<String>, body: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            severity,
        }
    }

    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(title, body, Severity::Info)
    }

    pub fn success(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(title, body, Severity::Success)
    }

    pub fn warning(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(title, body, Severity::Warning)
    }

    pub fn destructive(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(title, body, Severity::Destructive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_serialization() {
        assert_eq!(serde_json::to_string(&Severity::Destructive).unwrap(), "\"destructive\"");
        let severity: Severity = serde_json::from_str("\"success\"").unwrap();
        assert_eq!(severity, Severity::Success);
    }

    #[test]
    fn test_constructors_set_severity() {
        assert_eq!(NotableTransition::info("a", "b").severity, Severity::Info);
        assert_eq!(NotableTransition::warning("a", "b").severity, Severity::Warning);
    }
}
