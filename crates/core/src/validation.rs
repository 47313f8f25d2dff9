//! Form validation helpers.
//!
//! Every check collects [`FieldViolation`]s instead of failing fast so the
//! caller can show all missing fields at once.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Accumulates violations across several checks.
#[derive(Debug, Default)]
pub struct Violations(Vec<FieldViolation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation when `value` is empty or whitespace-only.
    pub fn require_non_blank(&mut self, field: &str, value: &str, message: &str) -> &mut Self {
        if is_blank(value) {
            self.0.push(FieldViolation::new(field, message));
        }
        self
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.0.push(FieldViolation::new(field, message));
        self
    }

    /// `Ok(())` when nothing was recorded, otherwise a [`CoreError::Validation`]
    /// carrying every violation in the order it was found.
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(self.0))
        }
    }
}

/// `true` for empty and whitespace-only strings.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
