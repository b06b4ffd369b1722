//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and the auth primitives.

pub mod auth;
pub mod todo;

pub use auth::{AuthService, IssuedToken, SignUpInput, BAD_CREDENTIALS};
pub use todo::{TodoPage, TodoService, TODO_NOT_FOUND};
