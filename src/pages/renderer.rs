//! Handlebars template registry for the HTML pages.
//!
//! Templates live in `templates/` and are embedded into the binary at
//! compile time. Every page template wraps its body in the `layout` partial,
//! which receives the page title and the navigation links.

use std::fmt;

use axum::response::{Html, IntoResponse, Response};
use handlebars::Handlebars;
use serde::Serialize;

use crate::error::BlogError;
use crate::routing::{AUTHOR_CREATE, AUTHOR_LIST, POST_CREATE, POST_LIST};

/// Name of the shared layout partial.
pub const LAYOUT: &str = "layout";
/// Post list template.
pub const POST_LIST_TEMPLATE: &str = "post_list";
/// Post detail template.
pub const POST_DETAIL_TEMPLATE: &str = "post_detail";
/// Author list template.
pub const AUTHOR_LIST_TEMPLATE: &str = "author_list";
/// Author detail template.
pub const AUTHOR_DETAIL_TEMPLATE: &str = "author_detail";
/// Generic create/edit form template.
pub const FORM_TEMPLATE: &str = "form";
/// Generic delete confirmation template.
pub const CONFIRM_DELETE_TEMPLATE: &str = "confirm_delete";
/// Error and not-found page template.
pub const ERROR_TEMPLATE: &str = "error";

const TEMPLATES: &[(&str, &str)] = &[
    (POST_LIST_TEMPLATE, include_str!("../../templates/post_list.hbs")),
    (POST_DETAIL_TEMPLATE, include_str!("../../templates/post_detail.hbs")),
    (AUTHOR_LIST_TEMPLATE, include_str!("../../templates/author_list.hbs")),
    (AUTHOR_DETAIL_TEMPLATE, include_str!("../../templates/author_detail.hbs")),
    (FORM_TEMPLATE, include_str!("../../templates/form.hbs")),
    (CONFIRM_DELETE_TEMPLATE, include_str!("../../templates/confirm_delete.hbs")),
    (ERROR_TEMPLATE, include_str!("../../templates/error.hbs")),
];

/// Navigation links shown on every page.
#[derive(Debug, Clone, Copy, Serialize)]
struct Nav {
    posts: &'static str,
    authors: &'static str,
    new_post: &'static str,
    new_author: &'static str,
}

const NAV: Nav = Nav {
    posts: POST_LIST.path(),
    authors: AUTHOR_LIST.path(),
    new_post: POST_CREATE.path(),
    new_author: AUTHOR_CREATE.path(),
};

/// Full template context: layout data plus the page-specific body.
#[derive(Debug, Serialize)]
struct Page<'a, T: Serialize> {
    title: &'a str,
    nav: Nav,
    page: &'a T,
}

#[derive(Debug, Serialize)]
struct ErrorPage {
    message: String,
}

/// Compiled page templates.
pub struct PageRenderer {
    registry: Handlebars<'static>,
}

impl fmt::Debug for PageRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageRenderer")
            .field("templates", &self.registry.get_templates().len())
            .finish()
    }
}

impl PageRenderer {
    /// Compiles the embedded templates.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Template`] if a template does not parse.
    pub fn new() -> Result<Self, BlogError> {
        let mut registry = Handlebars::new();
        registry
            .register_partial(LAYOUT, include_str!("../../templates/layout.hbs"))
            .map_err(|e| BlogError::Template(e.to_string()))?;
        for (name, source) in TEMPLATES {
            registry
                .register_template_string(name, source)
                .map_err(|e| BlogError::Template(e.to_string()))?;
        }
        Ok(Self { registry })
    }

    /// Renders `template` with `title` and the page body `page`.
    ///
    /// All interpolated values are HTML-escaped.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Template`] if rendering fails.
    pub fn render<T: Serialize>(
        &self,
        template: &str,
        title: &str,
        page: &T,
    ) -> Result<Html<String>, BlogError> {
        let context = Page {
            title,
            nav: NAV,
            page,
        };
        let body = self.registry.render(template, &context)?;
        Ok(Html(body))
    }

    /// Renders `err` as an HTML page with its mapped status code.
    ///
    /// Falls back to plain text if the error page itself cannot be rendered.
    #[must_use]
    pub fn render_error(&self, err: &BlogError) -> Response {
        let status = err.status_code();
        let (title, message) = match err {
            BlogError::NotFound { entity, .. } => (
                "Not found",
                format!("No {entity} matches the given query."),
            ),
            BlogError::ReferentialConstraint(_) => ("Cannot delete", err.to_string()),
            BlogError::MalformedBody(_) | BlogError::Validation(_) => {
                ("Bad request", err.to_string())
            }
            _ => {
                tracing::error!(error = %err, "page request failed");
                ("Server error", "Something went wrong on our side.".to_string())
            }
        };
        match self.render(ERROR_TEMPLATE, title, &ErrorPage { message }) {
            Ok(html) => (status, html).into_response(),
            Err(render_err) => {
                tracing::error!(error = %render_err, "error page failed to render");
                (status, err.to_string()).into_response()
            }
        }
    }
}

/// Converts a page controller outcome into a response.
pub fn respond<T: IntoResponse>(pages: &PageRenderer, result: Result<T, BlogError>) -> Response {
    match result {
        Ok(response) => response.into_response(),
        Err(err) => pages.render_error(&err),
    }
}
