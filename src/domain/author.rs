//! Author records.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ordering::{ListOrder, SortValue, Sortable};
use super::resource::{Resource, optional_text, required_text};
use super::schema::{EntityKind, EntitySchema, FieldKind, FieldSpec, FieldValues};
use super::RecordId;
use crate::error::BlogError;
use crate::store::BlogStore;

/// Field table of [`Author`].
pub const AUTHOR_SCHEMA: EntitySchema = EntitySchema {
    kind: EntityKind::Author,
    table: "blog_author",
    fields: &[
        FieldSpec {
            name: "first_name",
            column: "first_name",
            label: "First name",
            kind: FieldKind::ShortText { max_length: 100 },
            required: true,
        },
        FieldSpec {
            name: "last_name",
            column: "last_name",
            label: "Last name",
            kind: FieldKind::ShortText { max_length: 100 },
            required: true,
        },
        FieldSpec {
            name: "email",
            column: "email",
            label: "Email",
            kind: FieldKind::Email { max_length: 254 },
            required: true,
        },
        FieldSpec {
            name: "phone_number",
            column: "phone_number",
            label: "Phone number",
            kind: FieldKind::Phone { max_length: 20 },
            required: false,
        },
    ],
};

/// A blog author as stored and as sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Author {
    /// System-assigned identifier.
    #[schema(value_type = i64)]
    pub id: RecordId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact e-mail address.
    pub email: String,
    /// Contact phone number, blank when unknown.
    pub phone_number: String,
}

/// Validated fields of an author to insert or replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorDraft {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact e-mail address.
    pub email: String,
    /// Contact phone number, possibly blank.
    pub phone_number: String,
}

impl Author {
    /// Builds the stored record from a draft and its assigned id.
    #[must_use]
    pub fn from_draft(id: RecordId, draft: &AuthorDraft) -> Self {
        Self {
            id,
            first_name: draft.first_name.clone(),
            last_name: draft.last_name.clone(),
            email: draft.email.clone(),
            phone_number: draft.phone_number.clone(),
        }
    }

    /// `first_name last_name`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Sortable for Author {
    fn sort_value(&self, field: &str) -> SortValue<'_> {
        match field {
            "first_name" => SortValue::Text(&self.first_name),
            "last_name" => SortValue::Text(&self.last_name),
            "email" => SortValue::Text(&self.email),
            "phone_number" => SortValue::Text(&self.phone_number),
            _ => SortValue::Int(self.id.get()),
        }
    }
}

#[async_trait]
impl Resource for Author {
    type Draft = AuthorDraft;

    const SCHEMA: &'static EntitySchema = &AUTHOR_SCHEMA;

    fn id(&self) -> RecordId {
        self.id
    }

    fn values(&self) -> FieldValues {
        FieldValues::new()
            .with_text("first_name", self.first_name.as_str())
            .with_text("last_name", self.last_name.as_str())
            .with_text("email", self.email.as_str())
            .with_text("phone_number", self.phone_number.as_str())
    }

    fn draft(values: &FieldValues) -> Result<AuthorDraft, BlogError> {
        Ok(AuthorDraft {
            first_name: required_text(values, "first_name")?,
            last_name: required_text(values, "last_name")?,
            email: required_text(values, "email")?,
            phone_number: optional_text(values, "phone_number"),
        })
    }

    fn display_name(&self) -> String {
        self.full_name()
    }

    async fn list(store: &dyn BlogStore, order: ListOrder) -> Result<Vec<Self>, BlogError> {
        store.list_authors(order).await
    }

    async fn fetch(store: &dyn BlogStore, id: RecordId) -> Result<Option<Self>, BlogError> {
        store.get_author(id).await
    }

    async fn insert(store: &dyn BlogStore, draft: &AuthorDraft) -> Result<Self, BlogError> {
        store.insert_author(draft).await
    }

    async fn replace(
        store: &dyn BlogStore,
        id: RecordId,
        draft: &AuthorDraft,
    ) -> Result<Option<Self>, BlogError> {
        store.update_author(id, draft).await
    }

    async fn remove(store: &dyn BlogStore, id: RecordId) -> Result<bool, BlogError> {
        store.delete_author(id).await
    }
}
