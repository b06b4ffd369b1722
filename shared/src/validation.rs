//! Request validation
//!
//! Constraints are declared on the request types with the `validator`
//! derive. This module turns `validator` output into the wire error map:
//! field name → constraint tag → message.
//!
//! Tags: `required`, `min`/`max` for string lengths, `gte`/`lte` for
//! numeric bounds, and `email`.

use crate::errors::RequestError;
use serde_json::Value;
use std::collections::BTreeMap;
use validator::{Validate, ValidationError, ValidationErrors};

/// field → {constraint tag → message}
pub type FieldErrors = BTreeMap<String, BTreeMap<String, String>>;

/// Run the declared constraints of a decoded request
pub fn validate_request<T: Validate>(request: &T) -> Result<(), RequestError> {
    request
        .validate()
        .map_err(|errors| RequestError::Fields(field_errors(&errors)))
}

/// Map `validator` errors to tagged, human readable messages
///
/// # Panics
/// On a validation code with no registered message. Every code produced by
/// the request types in [`crate::types`] is covered.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut map = FieldErrors::new();

    for (field, field_errs) in errors.field_errors() {
        let name = field.to_string();
        let entry = map.entry(name.clone()).or_default();
        for err in field_errs.iter() {
            let (tag, message) = describe(&name, err);
            entry.insert(tag.to_string(), message);
        }
    }

    map
}

fn describe(field: &str, error: &ValidationError) -> (&'static str, String) {
    match error.code.as_ref() {
        "required" => ("required", format!("{field} is required")),
        "email" => {
            let value = error
                .params
                .get("value")
                .and_then(Value::as_str)
                .unwrap_or_default();
            ("email", format!("invalid email value for {field} (value: {value})"))
        }
        "length" => {
            // Only the length is echoed back; the value may be a password.
            let len = error
                .params
                .get("value")
                .and_then(Value::as_str)
                .map(|s| s.chars().count())
                .unwrap_or_default();

            match number_param(error, "min") {
                Some(min) if (len as f64) < min => (
                    "min",
                    format!(
                        "{field} should be at least {} characters long (current: {len})",
                        format_number(min)
                    ),
                ),
                _ => {
                    let max = number_param(error, "max").unwrap_or_default();
                    (
                        "max",
                        format!(
                            "{field} cannot exceed {} characters (current: {len})",
                            format_number(max)
                        ),
                    )
                }
            }
        }
        "range" => {
            let value = number_param(error, "value").unwrap_or_default();

            match number_param(error, "min") {
                Some(min) if value < min => (
                    "gte",
                    format!(
                        "{field} should be greater than or equal to {} (current: {})",
                        format_number(min),
                        format_number(value)
                    ),
                ),
                _ => {
                    let max = number_param(error, "max").unwrap_or_default();
                    (
                        "lte",
                        format!(
                            "{field} should be less than or equal to {} (current: {})",
                            format_number(max),
                            format_number(value)
                        ),
                    )
                }
            }
        }
        code => unreachable!("no message registered for validation code `{code}`"),
    }
}

fn number_param(error: &ValidationError, key: &str) -> Option<f64> {
    error.params.get(key).and_then(Value::as_f64)
}

/// Whole numbers print without a fractional part
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
