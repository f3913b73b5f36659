//! Server-rendered CRUD pages.
//!
//! One set of generic controllers ([`controllers`]) serves both entities;
//! what differs per entity (routes, list order, templates, page bodies) is
//! declared by its [`PageResource`] implementation.

pub mod controllers;
pub mod form;
pub mod renderer;
pub mod resources;

use axum::Router;
use axum::routing::get;

use crate::app_state::AppState;
use crate::domain::{Author, Post};

pub use renderer::PageRenderer;
pub use resources::PageResource;

/// Page routes for both entities.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(resource_routes::<Post>())
        .merge(resource_routes::<Author>())
}

fn resource_routes<R: PageResource>() -> Router<AppState> {
    Router::new()
        .route(R::LIST.template, get(controllers::list::<R>))
        .route(
            R::CREATE.template,
            get(controllers::create_form::<R>).post(controllers::create_submit::<R>),
        )
        .route(R::DETAIL.template, get(controllers::detail::<R>))
        .route(
            R::UPDATE.template,
            get(controllers::edit_form::<R>).post(controllers::edit_submit::<R>),
        )
        .route(
            R::DELETE.template,
            get(controllers::confirm_delete::<R>).post(controllers::delete_submit::<R>),
        )
}
