//! Authentication gate
//!
//! Turns an `Authorization: Bearer <token>` header into an [`AuthUser`].
//! Each step is a terminal rejection:
//! no header → malformed header → bad token → unknown user → authorized.
//! The user id in the token is re-resolved against the store on every
//! request, so tokens of users that no longer exist stop working.

use super::jwt::TokenError;
use crate::error::ApiError;
use crate::repositories::StoreError;
use crate::state::AppState;
use crate::telemetry;
use axum::{
    extract::{FromRef, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderValue},
    middleware::Next,
    response::Response,
};
use thiserror::Error;
use tracing::debug;

/// Authenticated user attached to the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}

/// Why the gate refused a request
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authorization header not found")]
    MissingHeader,

    #[error("Invalid Authorization header")]
    MalformedHeader,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Invalid token value")]
    UserNotFound,

    #[error("user lookup failed: {0}")]
    Lookup(#[from] StoreError),
}

impl AuthError {
    /// Short label used for metrics
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "missing_header",
            AuthError::MalformedHeader => "malformed_header",
            AuthError::Token(e) => e.reason(),
            AuthError::UserNotFound => "user_not_found",
            AuthError::Lookup(_) => "lookup_failed",
        }
    }
}

/// Extract the token from a `Bearer <token>` header value
///
/// The value must split into exactly two space-separated parts.
pub fn bearer_token(header: &HeaderValue) -> Result<&str, AuthError> {
    let value = header.to_str().map_err(|_| AuthError::MalformedHeader)?;
    if value.is_empty() {
        return Err(AuthError::MissingHeader);
    }

    let parts: Vec<&str> = value.split(' ').collect();
    match parts.as_slice() {
        [scheme, token] if scheme.eq_ignore_ascii_case("Bearer") && !token.is_empty() => Ok(*token),
        _ => Err(AuthError::MalformedHeader),
    }
}

/// Run the full gate against a raw header value
pub async fn authorize(
    state: &AppState,
    header: Option<&HeaderValue>,
) -> Result<AuthUser, AuthError> {
    let header = header.ok_or(AuthError::MissingHeader)?;
    let token = bearer_token(header)?;
    let claims = state.jwt().verify(token)?;

    let user = state
        .users()
        .find_by_id(claims.user_id)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    Ok(AuthUser { user_id: user.id })
}

fn reject(err: AuthError) -> ApiError {
    telemetry::record_auth_rejection(err.reason());
    debug!(reason = err.reason(), "Rejected request: {}", err);
    err.into()
}

/// Middleware applied to every protected route group
///
/// On success the [`AuthUser`] is stored in the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authorize(&state, request.headers().get(AUTHORIZATION))
        .await
        .map_err(reject)?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Reads the user placed by [`auth_middleware`], or runs the gate itself
/// when the route is mounted without the middleware.
#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(*user);
        }

        let app_state = AppState::from_ref(state);
        authorize(&app_state, parts.headers.get(AUTHORIZATION))
            .await
            .map_err(reject)
    }
}
