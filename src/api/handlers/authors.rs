//! Author endpoints: list, create, retrieve, replace, patch, delete.

use axum::Router;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;

use super::crud;
use crate::api::serializer::JsonBody;
use crate::app_state::AppState;
use crate::domain::Author;
use crate::domain::validation::Mode;
use crate::error::{BlogError, ErrorResponse};
use crate::routing::{AUTHOR_DETAIL_API, AUTHOR_LIST_API};

/// `GET /authors/` — List all authors.
///
/// # Errors
///
/// Returns [`BlogError`] on store failure.
#[utoipa::path(
    get,
    path = "/authors/",
    tag = "Authors",
    summary = "List authors",
    description = "Returns every author in insertion order.",
    responses(
        (status = 200, description = "All authors", body = Vec<Author>),
    )
)]
pub async fn list_authors(State(state): State<AppState>) -> Result<impl IntoResponse, BlogError> {
    crud::list::<Author>(&state).await
}

/// `POST /authors/` — Create an author.
///
/// # Errors
///
/// Returns [`BlogError::Validation`] if a field is missing or malformed.
#[utoipa::path(
    post,
    path = "/authors/",
    tag = "Authors",
    summary = "Create an author",
    description = "Creates an author. `first_name`, `last_name` and `email` are required; `phone_number` may be omitted or blank. Any `id` in the body is ignored.",
    request_body = Author,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 400, description = "Invalid fields", body = ErrorResponse),
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<impl IntoResponse, BlogError> {
    crud::create::<Author>(&state, body).await
}

/// `GET /authors/{id}/` — Get one author.
///
/// # Errors
///
/// Returns [`BlogError::NotFound`] if the author does not exist.
#[utoipa::path(
    get,
    path = "/authors/{id}/",
    tag = "Authors",
    summary = "Get an author",
    params(
        ("id" = i64, Path, description = "Author id"),
    ),
    responses(
        (status = 200, description = "Author", body = Author),
        (status = 404, description = "Author not found", body = ErrorResponse),
    )
)]
pub async fn retrieve_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, BlogError> {
    crud::retrieve::<Author>(&state, &id).await
}

/// `PUT /authors/{id}/` — Replace every field of an author.
///
/// # Errors
///
/// Returns [`BlogError::NotFound`] or [`BlogError::Validation`].
#[utoipa::path(
    put,
    path = "/authors/{id}/",
    tag = "Authors",
    summary = "Replace an author",
    params(
        ("id" = i64, Path, description = "Author id"),
    ),
    request_body = Author,
    responses(
        (status = 200, description = "Updated author", body = Author),
        (status = 400, description = "Invalid fields", body = ErrorResponse),
        (status = 404, description = "Author not found", body = ErrorResponse),
    )
)]
pub async fn replace_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: JsonBody,
) -> Result<impl IntoResponse, BlogError> {
    crud::update::<Author>(&state, &id, body, Mode::Full).await
}

/// `PATCH /authors/{id}/` — Update some fields of an author.
///
/// # Errors
///
/// Returns [`BlogError::NotFound`] or [`BlogError::Validation`].
#[utoipa::path(
    patch,
    path = "/authors/{id}/",
    tag = "Authors",
    summary = "Partially update an author",
    description = "Only the supplied fields are validated and changed.",
    params(
        ("id" = i64, Path, description = "Author id"),
    ),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Updated author", body = Author),
        (status = 400, description = "Invalid fields", body = ErrorResponse),
        (status = 404, description = "Author not found", body = ErrorResponse),
    )
)]
pub async fn patch_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: JsonBody,
) -> Result<impl IntoResponse, BlogError> {
    crud::update::<Author>(&state, &id, body, Mode::Partial).await
}

/// `DELETE /authors/{id}/` — Delete an author.
///
/// With the default cascade policy the author's posts are deleted too.
///
/// # Errors
///
/// Returns [`BlogError::NotFound`] if the author does not exist, or
/// [`BlogError::ReferentialConstraint`] under the restrict policy when the
/// author still has posts.
#[utoipa::path(
    delete,
    path = "/authors/{id}/",
    tag = "Authors",
    summary = "Delete an author",
    params(
        ("id" = i64, Path, description = "Author id"),
    ),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 404, description = "Author not found", body = ErrorResponse),
        (status = 409, description = "Author still has posts", body = ErrorResponse),
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, BlogError> {
    crud::destroy::<Author>(&state, &id).await
}

/// Author routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(AUTHOR_LIST_API.template, get(list_authors).post(create_author))
        .route(
            AUTHOR_DETAIL_API.template,
            get(retrieve_author)
                .put(replace_author)
                .patch(patch_author)
                .delete(delete_author),
        )
}
