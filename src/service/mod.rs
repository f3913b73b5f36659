//! Service layer: business logic orchestration.
//!
//! [`BlogService`] coordinates CRUD operations for every entity, resolves
//! references against the [`crate::store::BlogStore`], and logs each
//! mutation.

pub mod blog_service;

pub use blog_service::{BlogService, Choice};
