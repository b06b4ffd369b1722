//! API request and response types
//!
//! Request types carry their validation schema as `validator` attributes.
//! Every field is optional on the wire so that an absent value is reported
//! as a `required` violation instead of a decoding failure.

use crate::models::Todo;
use crate::validation::FieldErrors;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

// ============================================================================
// Response envelope
// ============================================================================

/// Outcome marker carried by every response
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Fail,
}

/// Uniform wrapper applied to every API response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T> {
    pub status: Status,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: Status::Success,
            data,
            error: None,
            errors: None,
        }
    }
}

impl Envelope<EmptyData> {
    /// Failure envelope; an empty field map is omitted from the output
    pub fn fail(error: Option<String>, errors: FieldErrors) -> Self {
        Self {
            status: Status::Fail,
            data: EmptyData::default(),
            error,
            errors: (!errors.is_empty()).then_some(errors),
        }
    }
}

/// Serializes as `{}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmptyData {}

/// Payload carrying only a human readable message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageData {
    pub msg: String,
}

impl MessageData {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

// ============================================================================
// Authentication
// ============================================================================

/// Sign-up request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SignUpRequest {
    #[validate(required, length(min = 5, max = 255))]
    pub name: Option<String>,
    #[validate(required, email, length(min = 5, max = 255))]
    pub email: Option<String>,
    #[validate(required, length(min = 8, max = 16))]
    pub password: Option<String>,
}

/// Sign-in request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SignInRequest {
    #[validate(required, email)]
    pub email: Option<String>,
    #[validate(required)]
    pub password: Option<String>,
}

/// Sign-in response payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignInData {
    pub msg: String,
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

// ============================================================================
// Todos
// ============================================================================

/// List request; `offset` defaults to zero
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ListTodosRequest {
    #[validate(required, range(min = 1, max = 100))]
    pub limit: Option<i64>,
    #[validate(range(min = 0))]
    pub offset: i64,
}

/// Create request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CreateTodoRequest {
    #[validate(required, length(min = 5, max = 100))]
    pub title: Option<String>,
    #[validate(required, length(min = 5, max = 255))]
    pub content: Option<String>,
}

/// Full-replace update request; `done` defaults to false
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateTodoRequest {
    #[validate(required, range(min = 1))]
    pub id: Option<i64>,
    #[validate(required, length(min = 5, max = 100))]
    pub title: Option<String>,
    #[validate(required, length(min = 5, max = 255))]
    pub content: Option<String>,
    #[serde(deserialize_with = "null_as_false")]
    pub done: bool,
}

/// `null` reads as `false`, like an absent flag
fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_default())
}

/// Delete request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DeleteTodoRequest {
    #[validate(required, range(min = 1))]
    pub id: Option<i64>,
}

/// List response payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoListData {
    pub todos: Vec<Todo>,
    pub total_todos_count: i64,
}

/// Create response payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoCreatedData {
    pub msg: String,
    pub todo: Todo,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_success_envelope_omits_error_fields() {
        let json = serde_json::to_value(Envelope::success(MessageData::new("running"))).unwrap();
        assert_eq!(json, serde_json::json!({"status": "success", "data": {"msg": "running"}}));
    }

    #[test]
    fn test_fail_envelope_has_empty_data() {
        let json = serde_json::to_value(Envelope::fail(
            Some("email is already taken".to_string()),
            FieldErrors::new(),
        ))
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "fail", "data": {}, "error": "email is already taken"})
        );
    }

    #[test]
    fn test_fail_envelope_carries_field_errors() {
        let mut errors = FieldErrors::new();
        errors.insert(
            "title".to_string(),
            BTreeMap::from([("required".to_string(), "title is required".to_string())]),
        );

        let json = serde_json::to_value(Envelope::fail(None, errors)).unwrap();
        assert_eq!(json["errors"]["title"]["required"], "title is required");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_missing_fields_decode_as_none() {
        let req: CreateTodoRequest = serde_json::from_str("{}").unwrap();
        assert!(req.title.is_none());
        assert!(req.content.is_none());

        let req: UpdateTodoRequest = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert!(!req.done);
    }

    #[test]
    fn test_null_done_reads_as_false() {
        let req: UpdateTodoRequest = serde_json::from_str(r#"{"id": 3, "done": null}"#).unwrap();
        assert!(!req.done);

        let req: UpdateTodoRequest = serde_json::from_str(r#"{"id": 3, "done": true}"#).unwrap();
        assert!(req.done);

        assert!(serde_json::from_str::<UpdateTodoRequest>(r#"{"done": "yes"}"#).is_err());
    }
}
