//! Error types for the filter crate.

use thiserror::Error;

/// Human-readable reasons a filter condition was rejected.
///
/// Validation never panics or aborts compilation: callers show these messages
/// next to the offending filter chip and let the user fix it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .0.join("; "))]
pub struct ValidationErrors(pub Vec<String>);

impl ValidationErrors {
    /// Returns the individual messages.
    pub fn messages(&self) -> &[String] {
        &self.0
    }

    /// Returns `true` if any message contains `needle` (case-insensitive).
    pub fn mentions(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.0.iter().any(|m| m.to_lowercase().contains(&needle))
    }

    pub(crate) fn check(messages: Vec<String>) -> std::result::Result<(), ValidationErrors> {
        if messages.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(messages))
        }
    }
}

/// Result type for filter validation.
pub type Result<T> = std::result::Result<T, ValidationErrors>;
