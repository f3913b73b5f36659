//! JSON endpoint handlers organized by resource.

pub mod authors;
pub mod crud;
pub mod posts;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(posts::routes())
        .merge(authors::routes())
}
