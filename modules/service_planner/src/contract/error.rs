//! Contract error types for the service planner
//!
//! These errors are transport-agnostic and used for inter-module communication.

/// Planner domain errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlannerError {
    /// Song, template, service or slot not found
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Resource type (song, template, service)
        resource: String,
        /// Resource identifier
        id: String,
    },
    /// Required field blank or too long
    #[error("Validation error on '{field}': {message}")]
    Validation {
        /// Offending field, for field-level display
        field: String,
        message: String,
    },
    /// Operation refused in the current state (e.g. deleting an in-use template)
    #[error("Conflict: {reason}")]
    Conflict { reason: String },
    /// Persistence failure
    #[error("Internal error")]
    Internal,
}

impl PlannerError {
    pub fn not_found(resource: &str, id: impl ToString) -> Self {
        Self::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }

    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
