//! # blog-cms
//!
//! Blog content-management backend for two entities, [`domain::Post`] and
//! [`domain::Author`], exposed both as a JSON API and as server-rendered
//! CRUD pages.
//!
//! Each entity is declared once as an [`domain::EntitySchema`]; JSON
//! cleaning, form binding, form rendering and SQL ordering are all derived
//! from it, and one set of generic controllers serves both entities.
//!
//! ## Architecture
//!
//! ```text
//! Clients (JSON, browser)
//!     │
//!     ├── Routing table (routing)
//!     ├── JSON controllers (api/)    ├── Page controllers (pages/)
//!     │
//!     ├── BlogService (service/)
//!     ├── Schemas, validation, ordering (domain/)
//!     │
//!     └── BlogStore (store/): in-memory or PostgreSQL
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod pages;
pub mod routing;
pub mod service;
pub mod store;
