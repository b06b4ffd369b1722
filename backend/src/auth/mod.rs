//! Authentication module
//!
//! Provides HS256 bearer tokens, salted password hashing, and the gate
//! that protects the todo routes.

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtKeys, JwtService, TokenError, TOKEN_ISSUER, TOKEN_SUBJECT};
pub use middleware::{auth_middleware, authorize, bearer_token, AuthError, AuthUser};
pub use password::PasswordService;
