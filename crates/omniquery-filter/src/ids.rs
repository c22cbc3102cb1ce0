//! Identifier generation for new filter conditions.
//!
//! There is no process-wide counter: callers own an [`IdGenerator`] and pass it
//! to [`create_filter`](crate::create_filter). Tests use [`SequentialIds`] for
//! deterministic ids, the UI bridge uses [`RandomIds`].

use uuid::Uuid;

/// Source of fresh identifiers.
pub trait IdGenerator {
    /// Returns an identifier not returned before by this generator.
    fn next_id(&mut self) -> String;
}

/// Deterministic `prefix_1`, `prefix_2`, ... identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    /// Creates a generator with the given prefix, starting at 1.
    pub fn new(prefix: impl Into<String>) -> Self {
        SequentialIds {
            prefix: prefix.into(),
            next: 1,
        }
    }

    /// Restarts numbering at 1.
    pub fn reset(&mut self) {
        self.next = 1;
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        SequentialIds::new("filter")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}_{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// Random UUID v4 identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}
