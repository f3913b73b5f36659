//! Resource-generic controller bodies.
//!
//! The per-entity handlers in [`super::posts`] and [`super::authors`] are
//! thin documented wrappers around these functions, instantiated once per
//! [`Resource`].

use axum::Json;
use axum::http::StatusCode;

use crate::api::serializer::{JsonBody, deserialize, read_body};
use crate::app_state::AppState;
use crate::domain::validation::{Mode, Source};
use crate::domain::{ListOrder, Resource};
use crate::error::BlogError;

/// Lists every record in insertion order.
///
/// # Errors
///
/// Returns [`BlogError::Persistence`] on store failure.
pub async fn list<R: Resource>(state: &AppState) -> Result<Json<Vec<R>>, BlogError> {
    let records = state.service.list::<R>(ListOrder::INSERTION).await?;
    Ok(Json(records))
}

/// Creates a record from a JSON body.
///
/// # Errors
///
/// Returns [`BlogError::MalformedBody`] or [`BlogError::Validation`] for a
/// bad body.
pub async fn create<R: Resource>(
    state: &AppState,
    body: JsonBody,
) -> Result<(StatusCode, Json<R>), BlogError> {
    let body = read_body(body)?;
    let values = deserialize::<R>(&body, Mode::Full)?;
    let record = state.service.create::<R>(values, Source::Json).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Returns one record.
///
/// # Errors
///
/// Returns [`BlogError::NotFound`] if no record has the id.
pub async fn retrieve<R: Resource>(state: &AppState, raw_id: &str) -> Result<Json<R>, BlogError> {
    let id = R::parse_id(raw_id)?;
    let record = state.service.get::<R>(id).await?;
    Ok(Json(record))
}

/// Updates a record; `mode` distinguishes PUT from PATCH.
///
/// The record is resolved before the body is looked at, so an unknown id
/// is reported as not found even when the body is also invalid.
///
/// # Errors
///
/// Returns [`BlogError::NotFound`] if no record has the id, or a body
/// error as for [`create`].
pub async fn update<R: Resource>(
    state: &AppState,
    raw_id: &str,
    body: JsonBody,
    mode: Mode,
) -> Result<Json<R>, BlogError> {
    let id = R::parse_id(raw_id)?;
    state.service.get::<R>(id).await?;

    let body = read_body(body)?;
    let changes = deserialize::<R>(&body, mode)?;
    let record = state.service.update::<R>(id, changes, Source::Json).await?;
    Ok(Json(record))
}

/// Deletes a record.
///
/// # Errors
///
/// Returns [`BlogError::NotFound`] if no record has the id, or
/// [`BlogError::ReferentialConstraint`] if dependants block the delete.
pub async fn destroy<R: Resource>(state: &AppState, raw_id: &str) -> Result<StatusCode, BlogError> {
    let id = R::parse_id(raw_id)?;
    state.service.delete::<R>(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
