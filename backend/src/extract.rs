//! Validated JSON extractor
//!
//! Decodes the body, which must be a JSON object, then runs the `validator`
//! schema declared on the request type. Decoding failures and constraint violations both come back
//! as an [`ApiError`] in the standard envelope.

use crate::error::ApiError;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use todo_shared::{validate_request, RequestError};
use validator::Validate;

const DATA_ERROR_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";
const NOT_AN_OBJECT: &str = "request body must be a JSON object";

/// JSON body that has passed its declared constraints
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw) = Json::<Value>::from_request(req, state)
            .await
            .map_err(request_error)?;

        // serde would otherwise accept an array as a positional struct
        if !raw.is_object() {
            return Err(RequestError::Malformed(NOT_AN_OBJECT.to_string()).into());
        }

        let bytes = serde_json::to_vec(&raw).map_err(|e| RequestError::Malformed(e.to_string()))?;
        let Json(value) = Json::<T>::from_bytes(&bytes).map_err(request_error)?;

        validate_request(&value)?;

        Ok(Self(value))
    }
}

/// Classify a body rejection
///
/// A value of the wrong JSON type becomes [`RequestError::TypeMismatch`]
/// naming the field; anything else is reported as malformed.
pub fn request_error(rejection: JsonRejection) -> RequestError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let text = err.body_text();
            type_mismatch(&text).unwrap_or(RequestError::Malformed(text))
        }
        other => RequestError::Malformed(other.body_text()),
    }
}

/// Parse `<path>: invalid type: <found>, expected <type> at line L column C`
fn type_mismatch(text: &str) -> Option<RequestError> {
    let detail = text.strip_prefix(DATA_ERROR_PREFIX).unwrap_or(text);
    let (field, rest) = detail.split_once(": ")?;
    if !rest.starts_with("invalid type") {
        return None;
    }

    let expected = rest.split_once("expected ")?.1;
    let expected = expected
        .split_once(" at line")
        .map_or(expected, |(head, _)| head);

    Some(RequestError::type_mismatch(field, expected))
}
