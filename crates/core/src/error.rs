use crate::validation::FieldViolation;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {}", join_messages(.0))]
    Validation(Vec<FieldViolation>),
}

impl CoreError {
    /// Shorthand for a validation error on a single field.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        CoreError::Validation(vec![FieldViolation::new(field, message)])
    }

    /// Field violations carried by a validation error, empty otherwise.
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            CoreError::Validation(violations) => violations,
            _ => &[],
        }
    }
}

fn join_messages(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
