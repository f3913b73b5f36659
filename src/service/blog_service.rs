//! Blog service: generic CRUD orchestration over any [`Resource`].

use std::sync::Arc;

use serde::Serialize;

use crate::domain::validation::{Source, unresolved_reference};
use crate::domain::{
    Author, EntityKind, EntitySchema, FieldValues, ListOrder, Post, RecordId, Resource, SortKey,
};
use crate::error::{BlogError, FieldErrors};
use crate::store::BlogStore;

/// Order in which authors are offered as form choices.
const CHOICE_ORDER: ListOrder =
    ListOrder::new(&[SortKey::asc("first_name"), SortKey::asc("last_name")]);

/// One selectable option of a reference field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    /// Identifier submitted when the option is selected.
    pub id: RecordId,
    /// Text shown to the user.
    pub label: String,
}

/// Orchestration layer shared by the JSON API and the pages.
///
/// Stateless coordinator over a [`BlogStore`]. Every mutation follows the
/// same pattern: resolve references → build draft → write → log. Field
/// cleaning happens before the service is called; the service only adds
/// the checks that need the store.
#[derive(Debug, Clone)]
pub struct BlogService {
    store: Arc<dyn BlogStore>,
}

impl BlogService {
    /// Creates a new `BlogService` over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn BlogStore>) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn BlogStore> {
        &self.store
    }

    /// Lists every record of `R` in `order`.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Persistence`] on store failure.
    pub async fn list<R: Resource>(&self, order: ListOrder) -> Result<Vec<R>, BlogError> {
        R::list(self.store.as_ref(), order).await
    }

    /// Fetches one record of `R`.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::NotFound`] if no record has `id`.
    pub async fn get<R: Resource>(&self, id: RecordId) -> Result<R, BlogError> {
        tracing::debug!(entity = %R::SCHEMA.kind, %id, "lookup");
        R::fetch(self.store.as_ref(), id)
            .await?
            .ok_or_else(|| BlogError::not_found(R::SCHEMA.kind, id))
    }

    /// Creates a record of `R` from fully cleaned `values`.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Validation`] if a reference does not resolve.
    pub async fn create<R: Resource>(
        &self,
        values: FieldValues,
        source: Source,
    ) -> Result<R, BlogError> {
        self.check_references(R::SCHEMA, &values, source).await?;
        let draft = R::draft(&values)?;
        let record = R::insert(self.store.as_ref(), &draft).await?;
        tracing::info!(entity = %R::SCHEMA.kind, id = %record.id(), "record created");
        Ok(record)
    }

    /// Applies `changes` over the stored record and writes the result.
    ///
    /// `changes` may hold every field (full replacement) or only some of them
    /// (partial update); fields it does not mention keep their stored value.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::NotFound`] if no record has `id`, or
    /// [`BlogError::Validation`] if a reference does not resolve.
    pub async fn update<R: Resource>(
        &self,
        id: RecordId,
        changes: FieldValues,
        source: Source,
    ) -> Result<R, BlogError> {
        let current: R = self.get(id).await?;
        let mut merged = current.values();
        merged.apply(changes);

        self.check_references(R::SCHEMA, &merged, source).await?;
        let draft = R::draft(&merged)?;
        let record = R::replace(self.store.as_ref(), id, &draft)
            .await?
            .ok_or_else(|| BlogError::not_found(R::SCHEMA.kind, id))?;
        tracing::info!(entity = %R::SCHEMA.kind, %id, "record updated");
        Ok(record)
    }

    /// Deletes one record of `R`.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::NotFound`] if no record has `id`, or
    /// [`BlogError::ReferentialConstraint`] if dependants block the delete.
    pub async fn delete<R: Resource>(&self, id: RecordId) -> Result<(), BlogError> {
        if !R::remove(self.store.as_ref(), id).await? {
            return Err(BlogError::not_found(R::SCHEMA.kind, id));
        }
        tracing::info!(entity = %R::SCHEMA.kind, %id, "record deleted");
        Ok(())
    }

    /// Lists the posts written by `author` in `order`.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Persistence`] on store failure.
    pub async fn posts_by_author(
        &self,
        author: RecordId,
        order: ListOrder,
    ) -> Result<Vec<Post>, BlogError> {
        self.store.list_posts_by_author(author, order).await
    }

    /// Selectable options for a reference field pointing at `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Persistence`] on store failure.
    pub async fn choices(&self, kind: EntityKind) -> Result<Vec<Choice>, BlogError> {
        let choices = match kind {
            EntityKind::Author => self
                .list::<Author>(CHOICE_ORDER)
                .await?
                .into_iter()
                .map(|a| Choice {
                    id: a.id,
                    label: a.display_name(),
                })
                .collect(),
            EntityKind::Post => self
                .list::<Post>(ListOrder::INSERTION)
                .await?
                .into_iter()
                .map(|p| Choice {
                    id: p.id,
                    label: p.display_name(),
                })
                .collect(),
        };
        Ok(choices)
    }

    /// Checks that every reference in `values` names an existing record.
    async fn check_references(
        &self,
        schema: &EntitySchema,
        values: &FieldValues,
        source: Source,
    ) -> Result<(), BlogError> {
        let mut errors = FieldErrors::new();
        for (field, target) in schema.references() {
            let Some(id) = values.reference(field.name) else {
                continue;
            };
            if !self.store.exists(target, id).await? {
                tracing::warn!(entity = %schema.kind, field = field.name, %id, "unresolved reference");
                errors.add(field.name, unresolved_reference(source, id));
            }
        }
        errors.into_result()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::validation::MSG_INVALID_CHOICE;
    use crate::store::{AuthorDeletePolicy, MemoryStore};

    fn make_service() -> BlogService {
        BlogService::new(Arc::new(MemoryStore::new(AuthorDeletePolicy::Cascade)))
    }

    fn author_values(first: &str, last: &str) -> FieldValues {
        FieldValues::new()
            .with_text("first_name", first)
            .with_text("last_name", last)
            .with_text("email", format!("{}@example.com", first.to_lowercase()))
            .with_text("phone_number", "")
    }

    fn post_values(title: &str, author: RecordId) -> FieldValues {
        FieldValues::new()
            .with_text("title", title)
            .with_text("content", "Body")
            .with_reference("author", author)
    }

    async fn make_author(service: &BlogService, first: &str, last: &str) -> Author {
        let Ok(author) = service
            .create::<Author>(author_values(first, last), Source::Json)
            .await
        else {
            panic!("author creation failed");
        };
        author
    }

    #[tokio::test]
    async fn create_post_echoes_input() {
        let service = make_service();
        let author = make_author(&service, "Ada", "Lovelace").await;
        let Ok(post) = service
            .create::<Post>(post_values("Hello", author.id), Source::Json)
            .await
        else {
            panic!("post creation failed");
        };
        assert_eq!(post.title, "Hello");
        assert_eq!(post.author, author.id);

        let Ok(listed) = service.list::<Post>(ListOrder::INSERTION).await else {
            panic!("list failed");
        };
        assert_eq!(listed, vec![post]);
    }

    #[tokio::test]
    async fn unresolved_author_is_a_validation_error() {
        let service = make_service();
        let result = service
            .create::<Post>(post_values("Hello", RecordId::new(404)), Source::Json)
            .await;
        let Err(BlogError::Validation(errors)) = result else {
            panic!("expected validation error");
        };
        assert_eq!(
            errors.get("author"),
            ["Invalid pk \"404\" - object does not exist.".to_string()]
        );
        let Ok(posts) = service.list::<Post>(ListOrder::INSERTION).await else {
            panic!("list failed");
        };
        assert!(posts.is_empty());
    }

    #[tokio::test]
    async fn form_source_words_reference_errors_as_choices() {
        let service = make_service();
        let result = service
            .create::<Post>(post_values("Hello", RecordId::new(8)), Source::Form)
            .await;
        let Err(BlogError::Validation(errors)) = result else {
            panic!("expected validation error");
        };
        assert_eq!(errors.get("author"), [MSG_INVALID_CHOICE.to_string()]);
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let service = make_service();
        let author = make_author(&service, "Ada", "Lovelace").await;
        let Ok(post) = service
            .create::<Post>(post_values("Old", author.id), Source::Json)
            .await
        else {
            panic!("post creation failed");
        };

        let changes = FieldValues::new().with_text("title", "New");
        let Ok(updated) = service.update::<Post>(post.id, changes, Source::Json).await else {
            panic!("update failed");
        };
        assert_eq!(updated.title, "New");
        assert_eq!(updated.content, post.content);
        assert_eq!(updated.author, post.author);

        let Ok(fetched) = service.get::<Post>(post.id).await else {
            panic!("get failed");
        };
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn missing_records_are_not_found() {
        let service = make_service();
        let id = RecordId::new(12);
        assert!(matches!(
            service.get::<Author>(id).await,
            Err(BlogError::NotFound { .. })
        ));
        assert!(matches!(
            service
                .update::<Author>(id, author_values("A", "B"), Source::Json)
                .await,
            Err(BlogError::NotFound { .. })
        ));
        assert!(matches!(
            service.delete::<Post>(id).await,
            Err(BlogError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn deleted_post_is_gone() {
        let service = make_service();
        let author = make_author(&service, "Ada", "Lovelace").await;
        let Ok(post) = service
            .create::<Post>(post_values("Bye", author.id), Source::Json)
            .await
        else {
            panic!("post creation failed");
        };
        assert!(service.delete::<Post>(post.id).await.is_ok());
        assert!(matches!(
            service.get::<Post>(post.id).await,
            Err(BlogError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn author_choices_are_sorted_by_name() {
        let service = make_service();
        make_author(&service, "Zoe", "Adams").await;
        make_author(&service, "Alan", "Turing").await;
        make_author(&service, "Alan", "Kay").await;
        let Ok(choices) = service.choices(EntityKind::Author).await else {
            panic!("choices failed");
        };
        let labels: Vec<&str> = choices.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Alan Kay", "Alan Turing", "Zoe Adams"]);
    }

    #[tokio::test]
    async fn posts_by_author_lists_only_their_posts() {
        let service = make_service();
        let ada = make_author(&service, "Ada", "Lovelace").await;
        let alan = make_author(&service, "Alan", "Turing").await;
        for (title, author) in [("A1", ada.id), ("T1", alan.id), ("A2", ada.id)] {
            let Ok(_) = service
                .create::<Post>(post_values(title, author), Source::Json)
                .await
            else {
                panic!("post creation failed");
            };
        }
        let Ok(posts) = service.posts_by_author(ada.id, ListOrder::INSERTION).await else {
            panic!("list failed");
        };
        let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["A1", "A2"]);
    }
}
