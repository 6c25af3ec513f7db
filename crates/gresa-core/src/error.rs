use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GresaError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Unknown formula: {0}")]
    UnknownFormula(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl GresaError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        GresaError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn division_by_zero(context: impl Into<String>) -> Self {
        GresaError::DivisionByZero {
            context: context.into(),
        }
    }

    /// True for errors the user can fix by correcting an input value.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            GresaError::InvalidInput { .. } | GresaError::DivisionByZero { .. }
        )
    }
}

impl From<serde_json::Error> for GresaError {
    fn from(e: serde_json::Error) -> Self {
        GresaError::SerializationError(e.to_string())
    }
}
