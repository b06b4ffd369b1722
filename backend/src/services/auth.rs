//! Sign-up and sign-in
//!
//! # Performance Optimizations
//!
//! - Password hashing/verification runs on blocking thread pool
//! - JWT service is passed by reference (pre-computed keys)

use crate::auth::{JwtService, PasswordService};
use crate::error::ApiError;
use crate::repositories::{NewUser, StoreError, UserRepository};
use crate::telemetry;
use todo_shared::User;
use tracing::info;

/// Returned for both an unknown email and a wrong password
pub const BAD_CREDENTIALS: &str = "email and password combination is wrong";

/// Validated sign-up input
#[derive(Debug, Clone)]
pub struct SignUpInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// A freshly issued bearer token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

/// Authentication operations
pub struct AuthService;

impl AuthService {
    /// Register a new user
    ///
    /// The email is checked before hashing so a taken address costs no
    /// hashing work; the store checks again on insert.
    pub async fn sign_up(
        users: &dyn UserRepository,
        passwords: &PasswordService,
        input: SignUpInput,
    ) -> Result<User, ApiError> {
        if users.find_by_email(&input.email).await?.is_some() {
            return Err(StoreError::EmailTaken.into());
        }

        let password_hash = passwords
            .hash_async(input.password)
            .await
            .map_err(ApiError::Internal)?;

        let user = users
            .insert(NewUser {
                name: input.name,
                email: input.email,
                password_hash,
            })
            .await?;

        telemetry::record_user_registered();
        info!(user_id = user.id, "User registered");

        Ok(user)
    }

    /// Check credentials and issue a token
    pub async fn sign_in(
        users: &dyn UserRepository,
        passwords: &PasswordService,
        jwt: &JwtService,
        email: &str,
        password: &str,
    ) -> Result<IssuedToken, ApiError> {
        let result = Self::check_credentials(users, passwords, email, password).await;
        telemetry::record_signin(match &result {
            Ok(_) => "success",
            Err(ApiError::BadRequest(_)) => "rejected",
            Err(_) => "error",
        });
        let user = result?;

        let token = jwt.issue(user.id).map_err(ApiError::Internal)?;

        Ok(IssuedToken {
            token,
            expires_in: jwt.token_lifetime_secs(),
        })
    }

    /// An unknown email still pays for one verification, against the decoy
    /// digest, so timing does not reveal which emails are registered.
    async fn check_credentials(
        users: &dyn UserRepository,
        passwords: &PasswordService,
        email: &str,
        password: &str,
    ) -> Result<User, ApiError> {
        let Some(user) = users.find_by_email(email).await? else {
            passwords
                .verify_decoy(password.to_string())
                .await
                .map_err(ApiError::Internal)?;
            return Err(ApiError::BadRequest(BAD_CREDENTIALS.to_string()));
        };

        let valid = PasswordService::verify_async(password.to_string(), user.password.clone())
            .await
            .map_err(ApiError::Internal)?;

        if !valid {
            return Err(ApiError::BadRequest(BAD_CREDENTIALS.to_string()));
        }

        Ok(user)
    }
}
