//! JSON serialization boundary of the API.
//!
//! Output needs nothing beyond `serde::Serialize` on the records. Input is
//! decoded as an arbitrary JSON value first and then cleaned against the
//! entity schema, so every field problem is reported at once instead of
//! stopping at the first serde error.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use serde_json::Value;

use crate::domain::validation::{Mode, clean_json};
use crate::domain::{FieldValues, Resource};
use crate::error::BlogError;

/// Request body as extracted by the handlers.
///
/// The rejection is kept so that a non-JSON body is reported through the
/// standard error envelope rather than axum's plain-text response.
pub type JsonBody = Result<Json<Value>, JsonRejection>;

/// Unwraps an extracted body.
///
/// # Errors
///
/// Returns [`BlogError::MalformedBody`] if the body was not valid JSON.
pub fn read_body(body: JsonBody) -> Result<Value, BlogError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            tracing::debug!(reason = %rejection.body_text(), "rejected request body");
            Err(BlogError::MalformedBody(rejection.body_text()))
        }
    }
}

/// Cleans a decoded body into field values for `R`.
///
/// # Errors
///
/// Returns [`BlogError::Validation`] with every failing field.
pub fn deserialize<R: Resource>(body: &Value, mode: Mode) -> Result<FieldValues, BlogError> {
    clean_json(R::SCHEMA, body, mode).map_err(BlogError::Validation)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::{Author, Post, RecordId};
    use crate::error::NON_FIELD_ERRORS;

    #[test]
    fn full_mode_reports_every_missing_field() {
        let Err(BlogError::Validation(errors)) = deserialize::<Post>(&json!({}), Mode::Full) else {
            panic!("expected validation error");
        };
        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(fields, vec!["author", "content", "title"]);
    }

    #[test]
    fn partial_mode_cleans_only_supplied_fields() {
        let Ok(values) = deserialize::<Post>(&json!({"title": "  Renamed "}), Mode::Partial) else {
            panic!("expected clean values");
        };
        assert_eq!(values.iter().count(), 1);
        assert_eq!(values.text("title"), Some("Renamed"));
    }

    #[test]
    fn id_and_unknown_keys_are_ignored() {
        let body = json!({
            "id": 99,
            "title": "Hello",
            "content": "World",
            "author": 3,
            "slug": "hello"
        });
        let Ok(values) = deserialize::<Post>(&body, Mode::Full) else {
            panic!("expected clean values");
        };
        assert_eq!(values.iter().count(), 3);
        assert_eq!(values.reference("author"), Some(RecordId::new(3)));
    }

    #[test]
    fn non_object_body_is_a_non_field_error() {
        let Err(BlogError::Validation(errors)) = deserialize::<Author>(&json!([1, 2]), Mode::Full)
        else {
            panic!("expected validation error");
        };
        assert_eq!(errors.get(NON_FIELD_ERRORS).len(), 1);
    }
}
