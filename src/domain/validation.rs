//! Field cleaning shared by the JSON serializer and the page forms.
//!
//! Cleaning turns raw submitted input into [`FieldValues`] following an
//! [`EntitySchema`]: required/blank checks, length limits, e-mail format
//! and reference syntax. Whether a reference resolves to an
//! existing record is checked later against the store.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::RecordId;
use super::schema::{EntitySchema, FieldKind, FieldSpec, FieldValue, FieldValues};
use crate::error::{FieldErrors, NON_FIELD_ERRORS};

/// Message for a required field that was not supplied.
pub const MSG_REQUIRED: &str = "This field is required.";
/// Message for a JSON `null` sent for a required field.
pub const MSG_NULL: &str = "This field may not be null.";
/// Message for an empty string sent for a required JSON field.
pub const MSG_BLANK: &str = "This field may not be blank.";
/// Message for a JSON value that cannot be read as text.
pub const MSG_NOT_STRING: &str = "Not a valid string.";
/// Message for a malformed e-mail address.
pub const MSG_EMAIL: &str = "Enter a valid email address.";
/// Message for a form reference that is malformed or does not resolve.
pub const MSG_INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";
/// Message for a JSON body that is not an object.
pub const MSG_NOT_OBJECT: &str = "Invalid data. Expected a dictionary.";

static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").ok());

/// Where the input came from; selects the wording of some messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// JSON API request body.
    Json,
    /// Submitted HTML form.
    Form,
}

/// Whether every required field must be supplied or only the supplied ones
/// are cleaned.
///
/// Optional fields left out of a JSON body are skipped in both modes, so an
/// update keeps their stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Create and full replacement: every required field is cleaned.
    Full,
    /// Partial update: only supplied fields are cleaned.
    Partial,
}

/// Message for a reference that parses but names no existing record.
#[must_use]
pub fn unresolved_reference(source: Source, id: RecordId) -> String {
    match source {
        Source::Json => format!("Invalid pk \"{id}\" - object does not exist."),
        Source::Form => MSG_INVALID_CHOICE.to_string(),
    }
}

/// Cleans a JSON request body against `schema`.
///
/// Keys that are not declared fields (including `id`) are ignored.
///
/// # Errors
///
/// Returns the collected [`FieldErrors`] if any field fails, or a
/// `non_field_errors` entry if `body` is not an object.
pub fn clean_json(
    schema: &EntitySchema,
    body: &Value,
    mode: Mode,
) -> Result<FieldValues, FieldErrors> {
    let Some(object) = body.as_object() else {
        return Err(FieldErrors::single(NON_FIELD_ERRORS, MSG_NOT_OBJECT));
    };

    let mut values = FieldValues::new();
    let mut errors = FieldErrors::new();
    for spec in schema.fields {
        let cleaned = match object.get(spec.name) {
            None if mode == Mode::Partial || !spec.required => continue,
            None => missing(spec),
            Some(Value::Null) if spec.required => Err(MSG_NULL.to_string()),
            Some(Value::Null) => missing(spec),
            Some(raw) => clean_json_value(spec, raw),
        };
        match cleaned {
            Ok(value) => values.insert(spec.name, value),
            Err(message) => errors.add(spec.name, message),
        }
    }

    if errors.is_empty() {
        Ok(values)
    } else {
        Err(errors)
    }
}

/// Cleans a submitted form against `schema`.
///
/// Every declared field is cleaned; submitted keys outside the schema are
/// ignored.
///
/// # Errors
///
/// Returns the collected [`FieldErrors`] if any field fails.
pub fn clean_form(
    schema: &EntitySchema,
    form: &HashMap<String, String>,
) -> Result<FieldValues, FieldErrors> {
    let mut values = FieldValues::new();
    let mut errors = FieldErrors::new();
    for spec in schema.fields {
        let raw = form.get(spec.name).map_or("", |s| s.trim());
        let cleaned = if raw.is_empty() {
            missing(spec)
        } else if let FieldKind::Reference(_) = spec.kind {
            RecordId::parse_segment(raw)
                .map(FieldValue::Reference)
                .ok_or_else(|| MSG_INVALID_CHOICE.to_string())
        } else {
            check_text(spec, raw)
        };
        match cleaned {
            Ok(value) => values.insert(spec.name, value),
            Err(message) => errors.add(spec.name, message),
        }
    }

    if errors.is_empty() {
        Ok(values)
    } else {
        Err(errors)
    }
}

fn missing(spec: &FieldSpec) -> Result<FieldValue, String> {
    if spec.required {
        Err(MSG_REQUIRED.to_string())
    } else {
        Ok(FieldValue::Text(String::new()))
    }
}

fn clean_json_value(spec: &FieldSpec, raw: &Value) -> Result<FieldValue, String> {
    if let FieldKind::Reference(_) = spec.kind {
        return match raw {
            Value::Number(n) => n
                .as_i64()
                .map(|n| FieldValue::Reference(RecordId::new(n)))
                .ok_or_else(|| incorrect_pk_type(raw)),
            Value::String(s) => s
                .trim()
                .parse::<RecordId>()
                .map(FieldValue::Reference)
                .map_err(|_| incorrect_pk_type(raw)),
            _ => Err(incorrect_pk_type(raw)),
        };
    }

    let text = match raw {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return Err(MSG_NOT_STRING.to_string()),
    };
    if text.is_empty() {
        return if spec.required {
            Err(MSG_BLANK.to_string())
        } else {
            Ok(FieldValue::Text(text))
        };
    }
    check_text(spec, &text)
}

fn incorrect_pk_type(raw: &Value) -> String {
    let type_name = match raw {
        Value::Null => "NoneType",
        Value::Bool(_) => "bool",
        Value::Number(_) => "float",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    };
    format!("Incorrect type. Expected pk value, received {type_name}.")
}

/// Validates non-empty text against the field's kind.
fn check_text(spec: &FieldSpec, text: &str) -> Result<FieldValue, String> {
    if let Some(max) = spec.kind.max_length()
        && text.chars().count() > max
    {
        return Err(format!("Ensure this field has no more than {max} characters."));
    }
    match spec.kind {
        FieldKind::Email { .. } if !is_email(text) => Err(MSG_EMAIL.to_string()),
        _ => Ok(FieldValue::Text(text.to_string())),
    }
}

/// Returns `true` if `s` has the shape `local@domain.tld`.
#[must_use]
pub fn is_email(s: &str) -> bool {
    EMAIL_RE.as_ref().is_some_and(|re| re.is_match(s))
}
