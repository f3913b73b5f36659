//! Post endpoints: list, create, retrieve, replace, patch, delete.

use axum::Router;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;

use super::crud;
use crate::api::serializer::JsonBody;
use crate::app_state::AppState;
use crate::domain::Post;
use crate::domain::validation::Mode;
use crate::error::{BlogError, ErrorResponse};
use crate::routing::{POST_DETAIL_API, POST_LIST_API};

/// `GET /posts/` — List all posts.
///
/// # Errors
///
/// Returns [`BlogError`] on store failure.
#[utoipa::path(
    get,
    path = "/posts/",
    tag = "Posts",
    summary = "List posts",
    description = "Returns every post in insertion order.",
    responses(
        (status = 200, description = "All posts", body = Vec<Post>),
    )
)]
pub async fn list_posts(State(state): State<AppState>) -> Result<impl IntoResponse, BlogError> {
    crud::list::<Post>(&state).await
}

/// `POST /posts/` — Create a post.
///
/// # Errors
///
/// Returns [`BlogError::Validation`] if a field is missing or malformed or
/// the author does not exist.
#[utoipa::path(
    post,
    path = "/posts/",
    tag = "Posts",
    summary = "Create a post",
    description = "Creates a post. `title`, `content` and `author` are required; `author` must be the id of an existing author. Any `id` in the body is ignored.",
    request_body = Post,
    responses(
        (status = 201, description = "Post created", body = Post),
        (status = 400, description = "Invalid fields", body = ErrorResponse),
    )
)]
pub async fn create_post(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<impl IntoResponse, BlogError> {
    crud::create::<Post>(&state, body).await
}

/// `GET /posts/{id}/` — Get one post.
///
/// # Errors
///
/// Returns [`BlogError::NotFound`] if the post does not exist.
#[utoipa::path(
    get,
    path = "/posts/{id}/",
    tag = "Posts",
    summary = "Get a post",
    params(
        ("id" = i64, Path, description = "Post id"),
    ),
    responses(
        (status = 200, description = "Post", body = Post),
        (status = 404, description = "Post not found", body = ErrorResponse),
    )
)]
pub async fn retrieve_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, BlogError> {
    crud::retrieve::<Post>(&state, &id).await
}

/// `PUT /posts/{id}/` — Replace every field of a post.
///
/// # Errors
///
/// Returns [`BlogError::NotFound`] or [`BlogError::Validation`].
#[utoipa::path(
    put,
    path = "/posts/{id}/",
    tag = "Posts",
    summary = "Replace a post",
    params(
        ("id" = i64, Path, description = "Post id"),
    ),
    request_body = Post,
    responses(
        (status = 200, description = "Updated post", body = Post),
        (status = 400, description = "Invalid fields", body = ErrorResponse),
        (status = 404, description = "Post not found", body = ErrorResponse),
    )
)]
pub async fn replace_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: JsonBody,
) -> Result<impl IntoResponse, BlogError> {
    crud::update::<Post>(&state, &id, body, Mode::Full).await
}

/// `PATCH /posts/{id}/` — Update some fields of a post.
///
/// # Errors
///
/// Returns [`BlogError::NotFound`] or [`BlogError::Validation`].
#[utoipa::path(
    patch,
    path = "/posts/{id}/",
    tag = "Posts",
    summary = "Partially update a post",
    description = "Only the supplied fields are validated and changed.",
    params(
        ("id" = i64, Path, description = "Post id"),
    ),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Updated post", body = Post),
        (status = 400, description = "Invalid fields", body = ErrorResponse),
        (status = 404, description = "Post not found", body = ErrorResponse),
    )
)]
pub async fn patch_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: JsonBody,
) -> Result<impl IntoResponse, BlogError> {
    crud::update::<Post>(&state, &id, body, Mode::Partial).await
}

/// `DELETE /posts/{id}/` — Delete a post.
///
/// # Errors
///
/// Returns [`BlogError::NotFound`] if the post does not exist.
#[utoipa::path(
    delete,
    path = "/posts/{id}/",
    tag = "Posts",
    summary = "Delete a post",
    params(
        ("id" = i64, Path, description = "Post id"),
    ),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 404, description = "Post not found", body = ErrorResponse),
    )
)]
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, BlogError> {
    crud::destroy::<Post>(&state, &id).await
}

/// Post routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(POST_LIST_API.template, get(list_posts).post(create_post))
        .route(
            POST_DETAIL_API.template,
            get(retrieve_post)
                .put(replace_post)
                .patch(patch_post)
                .delete(delete_post),
        )
}
