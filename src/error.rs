//! Blog error types with HTTP status code mapping.
//!
//! [`BlogError`] is the central error type of the service. Each variant
//! maps to a specific HTTP status code and a structured JSON error response.
//! Field-level validation failures travel as [`FieldErrors`].

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{EntityKind, RecordId};

/// Key under which errors not tied to a single field are reported.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Structured JSON error response body.
///
/// All API error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "validation failed: title",
///     "details": { "title": ["This field is required."] }
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Field-keyed error messages, present for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<FieldErrors>,
}

/// Field-keyed validation messages.
///
/// Serializes as `{"field": ["message", ...]}`; keys are kept sorted so
/// responses are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Creates an empty error set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message against `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Creates an error set holding a single message.
    #[must_use]
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Returns `true` if no message has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded against `field`, empty if none.
    #[must_use]
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    /// Names of the fields carrying at least one message.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Converts into `Err(BlogError::Validation)` unless empty.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Validation`] when at least one message is present.
    pub fn into_result(self) -> Result<(), BlogError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(BlogError::Validation(self))
        }
    }
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category            | HTTP Status               |
/// |-----------|---------------------|---------------------------|
/// | 1000–1999 | Validation          | 400 Bad Request           |
/// | 2000–2999 | Not Found/Conflict  | 404 Not Found / 409 Conflict |
/// | 3000–3999 | Server              | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum BlogError {
    /// One or more submitted fields are missing, malformed or reference
    /// a record that does not exist.
    #[error("validation failed: {}", .0.fields().collect::<Vec<_>>().join(", "))]
    Validation(FieldErrors),

    /// Request body could not be decoded at all.
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// No record of the given entity has the given id.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity that was looked up.
        entity: EntityKind,
        /// Requested identifier as received.
        id: String,
    },

    /// A write was rejected because it would leave a dangling reference.
    #[error("referential constraint violated: {0}")]
    ReferentialConstraint(String),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Page template failed to render.
    #[error("template error: {0}")]
    Template(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BlogError {
    /// Shorthand for [`BlogError::NotFound`] with a typed id.
    #[must_use]
    pub fn not_found(entity: EntityKind, id: RecordId) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Validation(_) => 1001,
            Self::MalformedBody(_) => 1002,
            Self::NotFound { .. } => 2001,
            Self::ReferentialConstraint(_) => 2002,
            Self::Internal(_) => 3000,
            Self::Persistence(_) => 3001,
            Self::Template(_) => 3002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::MalformedBody(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::ReferentialConstraint(_) => StatusCode::CONFLICT,
            Self::Persistence(_) | Self::Template(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<sqlx::Error> for BlogError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err
            && db.is_foreign_key_violation()
        {
            return Self::ReferentialConstraint(db.message().to_string());
        }
        tracing::error!(error = %err, "database operation failed");
        Self::Persistence(err.to_string())
    }
}

impl From<handlebars::RenderError> for BlogError {
    fn from(err: handlebars::RenderError) -> Self {
        Self::Template(err.to_string())
    }
}

impl IntoResponse for BlogError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();
        let message = self.to_string();
        let details = match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        };
        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message,
                details,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
