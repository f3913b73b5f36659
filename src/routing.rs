//! Routing table: every endpoint by name with its path template, and the
//! assembly of the complete application router.
//!
//! Redirect targets and links are computed from these templates with
//! [`Route::path_for`] instead of being spelled out at the call site.

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::AppState;
use crate::config::BlogConfig;
use crate::domain::RecordId;
use crate::error::BlogError;
use crate::pages::{self, PageRenderer};
use crate::service::BlogService;
use crate::store::BlogStore;

/// Placeholder for the record id in a path template.
const ID_PLACEHOLDER: &str = "{id}";

/// A named endpoint and its path template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    /// Stable endpoint name.
    pub name: &'static str,
    /// Axum path template; `{id}` stands for a record id.
    pub template: &'static str,
}

impl Route {
    const fn new(name: &'static str, template: &'static str) -> Self {
        Self { name, template }
    }

    /// Path of a route without parameters.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        self.template
    }

    /// Path of a route for the record `id`.
    #[must_use]
    pub fn path_for(&self, id: RecordId) -> String {
        self.template.replace(ID_PLACEHOLDER, &id.to_string())
    }
}

/// `GET/POST /posts/`
pub const POST_LIST_API: Route = Route::new("post_list_api", "/posts/");
/// `GET/PUT/PATCH/DELETE /posts/{id}/`
pub const POST_DETAIL_API: Route = Route::new("post_detail_api", "/posts/{id}/");
/// `GET/POST /authors/`
pub const AUTHOR_LIST_API: Route = Route::new("author_list_api", "/authors/");
/// `GET/PUT/PATCH/DELETE /authors/{id}/`
pub const AUTHOR_DETAIL_API: Route = Route::new("author_detail_api", "/authors/{id}/");

/// Post list page.
pub const POST_LIST: Route = Route::new("post_list", "/");
/// Post detail page.
pub const POST_DETAIL: Route = Route::new("post_detail", "/blog-posts/{id}/");
/// Post create form.
pub const POST_CREATE: Route = Route::new("post_create", "/blog-posts/new/");
/// Post edit form.
pub const POST_UPDATE: Route = Route::new("post_update", "/blog-posts/{id}/edit/");
/// Post delete confirmation.
pub const POST_DELETE: Route = Route::new("post_delete", "/blog-posts/{id}/delete/");

/// Author list page.
pub const AUTHOR_LIST: Route = Route::new("author_list", "/blog-authors/");
/// Author detail page.
pub const AUTHOR_DETAIL: Route = Route::new("author_detail", "/blog-authors/{id}/");
/// Author create form.
pub const AUTHOR_CREATE: Route = Route::new("author_create", "/blog-authors/new/");
/// Author edit form.
pub const AUTHOR_UPDATE: Route = Route::new("author_update", "/blog-authors/{id}/edit/");
/// Author delete confirmation.
pub const AUTHOR_DELETE: Route = Route::new("author_delete", "/blog-authors/{id}/delete/");

/// Every named route.
pub const ROUTES: &[Route] = &[
    POST_LIST_API,
    POST_DETAIL_API,
    AUTHOR_LIST_API,
    AUTHOR_DETAIL_API,
    POST_LIST,
    POST_DETAIL,
    POST_CREATE,
    POST_UPDATE,
    POST_DELETE,
    AUTHOR_LIST,
    AUTHOR_DETAIL,
    AUTHOR_CREATE,
    AUTHOR_UPDATE,
    AUTHOR_DELETE,
];

/// Assembles the full application: JSON API, pages, system endpoints and
/// the HTTP middleware stack.
pub fn build_router(state: AppState, config: &BlogConfig) -> Router {
    let router = Router::new()
        .merge(api::build_router(&config.api_prefix))
        .merge(pages::routes())
        .merge(api::handlers::system::routes(&config.api_prefix))
        .layer(TraceLayer::new_for_http());

    let router = if config.cors_permissive {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.with_state(state)
}

/// Wires a store into a ready-to-serve application.
///
/// # Errors
///
/// Returns [`BlogError::Template`] if the page templates do not compile.
pub fn app(store: Arc<dyn BlogStore>, config: &BlogConfig) -> Result<Router, BlogError> {
    let state = AppState::new(BlogService::new(store), PageRenderer::new()?);
    Ok(build_router(state, config))
}
