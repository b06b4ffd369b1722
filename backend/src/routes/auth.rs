//! Authentication routes
//!
//! Sign-up and sign-in. Both are public; everything under `/todo`
//! requires the token issued here.
//!
//! # Performance Optimizations
//!
//! - Uses pre-computed JWT keys from AppState (no per-request allocation)
//! - Password hashing runs on blocking thread pool (doesn't block async runtime)

use crate::error::ApiResult;
use crate::extract::ValidatedJson;
use crate::services::{AuthService, SignUpInput};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use todo_shared::{Envelope, MessageData, SignInData, SignInRequest, SignUpRequest};

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(sign_up))
        .route("/signin", post(sign_in))
}

/// Register a new user
///
/// POST /v1/auth/signup
async fn sign_up(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SignUpRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<MessageData>>)> {
    let input = SignUpInput {
        name: req.name.unwrap_or_default(),
        email: req.email.unwrap_or_default(),
        password: req.password.unwrap_or_default(),
    };

    AuthService::sign_up(state.users(), state.passwords(), input).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::success(MessageData::new("user has created"))),
    ))
}

/// Exchange credentials for a bearer token
///
/// POST /v1/auth/signin
async fn sign_in(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SignInRequest>,
) -> ApiResult<Json<Envelope<SignInData>>> {
    let email = req.email.unwrap_or_default();
    let password = req.password.unwrap_or_default();

    let issued = AuthService::sign_in(
        state.users(),
        state.passwords(),
        state.jwt(),
        &email,
        &password,
    )
    .await?;

    Ok(Json(Envelope::success(SignInData {
        msg: "signin has completed".to_string(),
        token: issued.token,
        token_type: "Bearer".to_string(),
        expires_in: issued.expires_in,
    })))
}
