//! Todo Service Shared Library
//!
//! This crate contains the wire types, models, and request validation
//! used by the backend and by API clients.

pub mod errors;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::{Todo, User};
pub use types::*;
pub use validation::{field_errors, validate_request, FieldErrors};
