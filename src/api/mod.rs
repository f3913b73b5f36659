//! JSON API layer: route handlers, serializer, and the OpenAPI document.
//!
//! Resource endpoints are mounted under the configured API prefix (none by
//! default); system endpoints always live at the root.

pub mod handlers;
pub mod serializer;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;
use crate::domain::{Author, Post};
use crate::error::{ErrorBody, ErrorResponse};
use handlers::{authors, posts, system};

/// OpenAPI description of the JSON API.
#[derive(Debug, OpenApi)]
#[openapi(
    paths(
        posts::list_posts,
        posts::create_post,
        posts::retrieve_post,
        posts::replace_post,
        posts::patch_post,
        posts::delete_post,
        authors::list_authors,
        authors::create_author,
        authors::retrieve_author,
        authors::replace_author,
        authors::patch_author,
        authors::delete_author,
        system::health_handler,
    ),
    components(schemas(Post, Author, ErrorResponse, ErrorBody, system::HealthResponse)),
    tags(
        (name = "Posts", description = "Blog posts"),
        (name = "Authors", description = "Post authors"),
        (name = "System", description = "Health and metadata"),
    )
)]
pub struct ApiDoc;

/// Builds the OpenAPI document with resource paths under `api_prefix`.
#[must_use]
pub fn openapi(api_prefix: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    if !api_prefix.is_empty() {
        doc.paths.paths = std::mem::take(&mut doc.paths.paths)
            .into_iter()
            .map(|(path, item)| {
                if path == "/health" {
                    (path, item)
                } else {
                    (format!("{api_prefix}{path}"), item)
                }
            })
            .collect();
    }
    doc
}

/// Builds the resource router, nested under `api_prefix` when one is set.
pub fn build_router(api_prefix: &str) -> Router<AppState> {
    if api_prefix.is_empty() {
        handlers::routes()
    } else {
        Router::new().nest(api_prefix, handlers::routes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_resource_path() {
        let doc = openapi("");
        for path in ["/posts/", "/posts/{id}/", "/authors/", "/authors/{id}/", "/health"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn prefix_applies_to_resources_only() {
        let doc = openapi("/api");
        assert!(doc.paths.paths.contains_key("/api/posts/"));
        assert!(doc.paths.paths.contains_key("/api/authors/{id}/"));
        assert!(doc.paths.paths.contains_key("/health"));
        assert!(!doc.paths.paths.contains_key("/posts/"));
    }
}
