//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::pages::PageRenderer;
use crate::service::BlogService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Blog service for all business logic.
    pub service: Arc<BlogService>,
    /// Template registry for the HTML pages.
    pub pages: Arc<PageRenderer>,
}

impl AppState {
    /// Bundles a service and a renderer into handler state.
    #[must_use]
    pub fn new(service: BlogService, pages: PageRenderer) -> Self {
        Self {
            service: Arc::new(service),
            pages: Arc::new(pages),
        }
    }
}
