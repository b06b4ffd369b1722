//! Error types for the Todo service

use crate::validation::FieldErrors;
use thiserror::Error;

/// Why an inbound request body was rejected
///
/// A type mismatch is reported on its own and never merged into the
/// per-field constraint map.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("Invalid json type for field: {field:?}, expected type: {expected:?}")]
    TypeMismatch { field: String, expected: String },

    #[error("request failed validation on {} field(s)", .0.len())]
    Fields(FieldErrors),

    #[error("{0}")]
    Malformed(String),
}

impl RequestError {
    pub fn type_mismatch(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected: expected.into(),
        }
    }
}
