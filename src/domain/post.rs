//! Post records.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ordering::{ListOrder, SortValue, Sortable};
use super::resource::{Resource, required_text};
use super::schema::{EntityKind, EntitySchema, FieldKind, FieldSpec, FieldValues};
use super::validation::MSG_REQUIRED;
use super::RecordId;
use crate::error::{BlogError, FieldErrors};
use crate::store::BlogStore;

/// Field table of [`Post`].
pub const POST_SCHEMA: EntitySchema = EntitySchema {
    kind: EntityKind::Post,
    table: "blog_post",
    fields: &[
        FieldSpec {
            name: "title",
            column: "title",
            label: "Title",
            kind: FieldKind::ShortText { max_length: 200 },
            required: true,
        },
        FieldSpec {
            name: "content",
            column: "content",
            label: "Content",
            kind: FieldKind::LongText,
            required: true,
        },
        FieldSpec {
            name: "author",
            column: "author_id",
            label: "Author",
            kind: FieldKind::Reference(EntityKind::Author),
            required: true,
        },
    ],
};

/// A blog post as stored and as sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Post {
    /// System-assigned identifier.
    #[schema(value_type = i64)]
    pub id: RecordId,
    /// Headline.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Identifier of the author who wrote the post.
    #[schema(value_type = i64)]
    #[sqlx(rename = "author_id")]
    pub author: RecordId,
}

/// Validated fields of a post to insert or replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    /// Headline.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Author reference, expected to resolve.
    pub author: RecordId,
}

impl Post {
    /// Builds the stored record from a draft and its assigned id.
    #[must_use]
    pub fn from_draft(id: RecordId, draft: &PostDraft) -> Self {
        Self {
            id,
            title: draft.title.clone(),
            content: draft.content.clone(),
            author: draft.author,
        }
    }
}

impl Sortable for Post {
    fn sort_value(&self, field: &str) -> SortValue<'_> {
        match field {
            "title" => SortValue::Text(&self.title),
            "content" => SortValue::Text(&self.content),
            "author" => SortValue::Int(self.author.get()),
            _ => SortValue::Int(self.id.get()),
        }
    }
}

#[async_trait]
impl Resource for Post {
    type Draft = PostDraft;

    const SCHEMA: &'static EntitySchema = &POST_SCHEMA;

    fn id(&self) -> RecordId {
        self.id
    }

    fn values(&self) -> FieldValues {
        FieldValues::new()
            .with_text("title", self.title.as_str())
            .with_text("content", self.content.as_str())
            .with_reference("author", self.author)
    }

    fn draft(values: &FieldValues) -> Result<PostDraft, BlogError> {
        let author = values
            .reference("author")
            .ok_or_else(|| BlogError::Validation(FieldErrors::single("author", MSG_REQUIRED)))?;
        Ok(PostDraft {
            title: required_text(values, "title")?,
            content: required_text(values, "content")?,
            author,
        })
    }

    fn display_name(&self) -> String {
        self.title.clone()
    }

    async fn list(store: &dyn BlogStore, order: ListOrder) -> Result<Vec<Self>, BlogError> {
        store.list_posts(order).await
    }

    async fn fetch(store: &dyn BlogStore, id: RecordId) -> Result<Option<Self>, BlogError> {
        store.get_post(id).await
    }

    async fn insert(store: &dyn BlogStore, draft: &PostDraft) -> Result<Self, BlogError> {
        store.insert_post(draft).await
    }

    async fn replace(
        store: &dyn BlogStore,
        id: RecordId,
        draft: &PostDraft,
    ) -> Result<Option<Self>, BlogError> {
        store.update_post(id, draft).await
    }

    async fn remove(store: &dyn BlogStore, id: RecordId) -> Result<bool, BlogError> {
        store.delete_post(id).await
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn author_serializes_as_bare_id() {
        let post = Post {
            id: RecordId::new(1),
            title: "Hello".to_string(),
            content: "World".to_string(),
            author: RecordId::new(4),
        };
        let Ok(json) = serde_json::to_value(&post) else {
            panic!("serialization failed");
        };
        assert_eq!(
            json,
            serde_json::json!({"id": 1, "title": "Hello", "content": "World", "author": 4})
        );
    }

    #[test]
    fn draft_needs_author_reference() {
        let values = FieldValues::new()
            .with_text("title", "t")
            .with_text("content", "c");
        let Err(BlogError::Validation(errors)) = Post::draft(&values) else {
            panic!("expected validation error");
        };
        assert_eq!(errors.get("author"), [MSG_REQUIRED.to_string()]);
    }

    #[test]
    fn sort_projection_covers_reference() {
        let post = Post {
            id: RecordId::new(2),
            title: "b".to_string(),
            content: String::new(),
            author: RecordId::new(9),
        };
        assert_eq!(post.sort_value("author"), SortValue::Int(9));
        assert_eq!(post.sort_value("id"), SortValue::Int(2));
        assert_eq!(post.sort_value("title"), SortValue::Text("b"));
    }

    #[test]
    fn path_ids_must_be_positive_integers() {
        for raw in ["abc", "0", "-1", "1.5", ""] {
            assert!(
                matches!(Post::parse_id(raw), Err(BlogError::NotFound { entity: EntityKind::Post, ref id }) if id == raw),
                "{raw:?} should be not found"
            );
        }
        assert!(matches!(Post::parse_id("12"), Ok(id) if id == RecordId::new(12)));
    }
}
