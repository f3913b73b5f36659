//! Domain layer: entity schemas, typed records, ordering and field cleaning.
//!
//! Both entities are declared once as an [`EntitySchema`]; everything that
//! needs to know about fields (JSON cleaning, forms, SQL ordering) reads it
//! from there.

pub mod author;
pub mod ordering;
pub mod post;
pub mod record_id;
pub mod resource;
pub mod schema;
pub mod validation;

pub use author::{AUTHOR_SCHEMA, Author, AuthorDraft};
pub use ordering::{Direction, ListOrder, SortKey, SortValue, Sortable};
pub use post::{POST_SCHEMA, Post, PostDraft};
pub use record_id::RecordId;
pub use resource::Resource;
pub use schema::{EntityKind, EntitySchema, FieldKind, FieldSpec, FieldValue, FieldValues};
