//! JWT token generation and validation
//!
//! Tokens are HS256-signed and carry the user id together with a validity
//! window. No session state is kept server side.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Issuer written into and required from every token
pub const TOKEN_ISSUER: &str = "todo_authentication";
/// Subject written into and required from every token
pub const TOKEN_SUBJECT: &str = "auth";

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub user_id: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Not before (Unix timestamp)
    pub nbf: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    pub iss: String,
    pub sub: String,
}

/// Why a token was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is expired")]
    Expired,

    #[error("token is not valid yet")]
    NotYetValid,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token signing method is not HS256")]
    WrongAlgorithm,

    #[error("token issuer or subject is invalid")]
    WrongIssuer,

    #[error("token is malformed: {0}")]
    Malformed(String),
}

impl TokenError {
    /// Short label used for metrics
    pub fn reason(&self) -> &'static str {
        match self {
            TokenError::Expired => "expired",
            TokenError::NotYetValid => "not_yet_valid",
            TokenError::InvalidSignature => "invalid_signature",
            TokenError::WrongAlgorithm => "wrong_algorithm",
            TokenError::WrongIssuer => "wrong_issuer",
            TokenError::Malformed(_) => "malformed_token",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::ImmatureSignature => TokenError::NotYetValid,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::InvalidAlgorithm => TokenError::WrongAlgorithm,
            ErrorKind::InvalidIssuer | ErrorKind::InvalidSubject => TokenError::WrongIssuer,
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}

/// Pre-computed JWT keys for efficient token operations
/// These are derived once and cached in AppState
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    /// Create new JWT keys from secret
    /// This should be called once at startup
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }

    pub fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

/// JWT service for token operations
///
/// Cloning is cheap: keys and validation rules sit behind `Arc`.
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    validation: Arc<Validation>,
    token_lifetime_secs: i64,
}

impl JwtService {
    /// Create a new JWT service with pre-computed keys
    pub fn new(secret: &str, token_lifetime_secs: i64, leeway_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_secs;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "sub"]);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.sub = Some(TOKEN_SUBJECT.to_string());

        Self {
            keys: JwtKeys::new(secret),
            validation: Arc::new(validation),
            token_lifetime_secs,
        }
    }

    /// Issue a token for a user, valid from now for the configured lifetime
    #[inline]
    pub fn issue(&self, user_id: i64) -> Result<String> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    pub fn issue_at(&self, user_id: i64, now: DateTime<Utc>) -> Result<String> {
        let exp = Duration::try_seconds(self.token_lifetime_secs)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Token lifetime of {}s is out of range",
                    self.token_lifetime_secs
                )
            })?;

        let claims = Claims {
            user_id,
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: exp.timestamp(),
            iss: TOKEN_ISSUER.to_string(),
            sub: TOKEN_SUBJECT.to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, self.keys.encoding())
            .map_err(|e| anyhow::anyhow!("Failed to sign token: {}", e))
    }

    /// Check signature, algorithm, issuer and validity window
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let token_data = decode::<Claims>(token, self.keys.decoding(), &self.validation)?;
        Ok(token_data.claims)
    }

    /// Token lifetime in seconds
    #[inline]
    pub fn token_lifetime_secs(&self) -> i64 {
        self.token_lifetime_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn create_test_service() -> JwtService {
        JwtService::new("test-secret", 3600, 0)
    }

    #[test]
    fn test_issue_and_verify() {
        let service = create_test_service();

        let token = service.issue(42).unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.iss, TOKEN_ISSUER);
        assert_eq!(claims.sub, TOKEN_SUBJECT);
        assert_eq!(claims.iat, claims.nbf);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_out_of_range_lifetime_fails_to_issue() {
        let service = JwtService::new("test-secret", i64::MAX, 0);
        assert!(service.issue(1).is_err());

        let service = JwtService::new("test-secret", i64::MAX / 1_000, 0);
        assert!(service.issue(1).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = create_test_service();
        let issued = Utc::now() - Duration::seconds(3601);

        let token = service.issue_at(1, issued).unwrap();
        assert_eq!(service.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_future_token_rejected() {
        let service = create_test_service();
        let issued = Utc::now() + Duration::seconds(120);

        let token = service.issue_at(1, issued).unwrap();
        assert_eq!(service.verify(&token), Err(TokenError::NotYetValid));
    }

    #[test]
    fn test_leeway_tolerates_small_skew() {
        let service = JwtService::new("test-secret", 3600, 60);
        let issued = Utc::now() + Duration::seconds(30);

        let token = service.issue_at(1, issued).unwrap();
        assert!(service.verify(&token).is_ok());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtService::new("other-secret", 3600, 0).issue(1).unwrap();
        assert_eq!(
            create_test_service().verify(&token),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_wrong_algorithm_rejected() {
        let claims = Claims {
            user_id: 1,
            iat: Utc::now().timestamp(),
            nbf: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::seconds(60)).timestamp(),
            iss: TOKEN_ISSUER.to_string(),
            sub: TOKEN_SUBJECT.to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert_eq!(
            create_test_service().verify(&token),
            Err(TokenError::WrongAlgorithm)
        );
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let claims = Claims {
            user_id: 1,
            iat: Utc::now().timestamp(),
            nbf: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::seconds(60)).timestamp(),
            iss: "someone_else".to_string(),
            sub: TOKEN_SUBJECT.to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert_eq!(
            create_test_service().verify(&token),
            Err(TokenError::WrongIssuer)
        );
    }

    #[test]
    fn test_invalid_token_rejected() {
        let result = create_test_service().verify("invalid.token.here");
        assert!(matches!(result, Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_service_is_clone_cheap() {
        let service = create_test_service();
        let cloned = service.clone();
        let token = service.issue(5).unwrap();
        assert_eq!(cloned.verify(&token).unwrap().user_id, 5);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        /// A token is accepted before its lifetime elapses and rejected after
        #[test]
        fn prop_lifetime_window(lifetime in 30i64..86_400, user_id in 1i64..1_000_000) {
            let service = JwtService::new("test-secret", lifetime, 0);
            let now = Utc::now();

            let fresh = service.issue_at(user_id, now - Duration::seconds(lifetime - 10)).unwrap();
            prop_assert_eq!(service.verify(&fresh).map(|c| c.user_id), Ok(user_id));

            let stale = service.issue_at(user_id, now - Duration::seconds(lifetime + 10)).unwrap();
            prop_assert_eq!(service.verify(&stale), Err(TokenError::Expired));
        }
    }
}
