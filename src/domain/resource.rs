//! The [`Resource`] trait: what the generic controllers need from an entity.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use super::ordering::{ListOrder, Sortable};
use super::schema::{EntitySchema, FieldValues};
use super::RecordId;
use crate::error::BlogError;
use crate::store::BlogStore;

/// A persisted entity served by the generic CRUD controllers.
///
/// Implemented once per entity type. The schema drives cleaning and form
/// rendering, `Serialize` is the JSON wire shape, and the associated
/// functions dispatch to the matching [`BlogStore`] operations.
#[async_trait]
pub trait Resource: Serialize + Sortable + Clone + fmt::Debug + Send + Sync + 'static {
    /// Validated field set used for inserts and replacements.
    type Draft: fmt::Debug + Send + Sync;

    /// Field table of the entity.
    const SCHEMA: &'static EntitySchema;

    /// System-assigned identifier.
    fn id(&self) -> RecordId;

    /// Current field values, used to merge partial updates and pre-fill forms.
    fn values(&self) -> FieldValues;

    /// Builds a draft from a complete set of cleaned values.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Validation`] if a required value is absent.
    fn draft(values: &FieldValues) -> Result<Self::Draft, BlogError>;

    /// Short human-readable label, e.g. for confirmation pages and choices.
    fn display_name(&self) -> String;

    /// Parses a path id; anything but a positive integer names no record.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::NotFound`] for a malformed id.
    fn parse_id(raw: &str) -> Result<RecordId, BlogError> {
        RecordId::parse_segment(raw).ok_or_else(|| BlogError::NotFound {
            entity: Self::SCHEMA.kind,
            id: raw.to_string(),
        })
    }

    /// Lists every record in `order`.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Persistence`] on store failure.
    async fn list(store: &dyn BlogStore, order: ListOrder) -> Result<Vec<Self>, BlogError>;

    /// Fetches one record.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Persistence`] on store failure.
    async fn fetch(store: &dyn BlogStore, id: RecordId) -> Result<Option<Self>, BlogError>;

    /// Inserts a new record and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::ReferentialConstraint`] if a reference does not
    /// resolve, or [`BlogError::Persistence`] on store failure.
    async fn insert(store: &dyn BlogStore, draft: &Self::Draft) -> Result<Self, BlogError>;

    /// Replaces every field of an existing record.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::ReferentialConstraint`] if a reference does not
    /// resolve, or [`BlogError::Persistence`] on store failure.
    async fn replace(
        store: &dyn BlogStore,
        id: RecordId,
        draft: &Self::Draft,
    ) -> Result<Option<Self>, BlogError>;

    /// Deletes a record, returning whether it existed.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::ReferentialConstraint`] if dependants block the
    /// delete, or [`BlogError::Persistence`] on store failure.
    async fn remove(store: &dyn BlogStore, id: RecordId) -> Result<bool, BlogError>;
}

/// Reads a required text value out of a cleaned value set.
pub(crate) fn required_text(values: &FieldValues, name: &str) -> Result<String, BlogError> {
    values.text(name).map(str::to_string).ok_or_else(|| {
        BlogError::Validation(crate::error::FieldErrors::single(
            name,
            super::validation::MSG_REQUIRED,
        ))
    })
}

/// Reads an optional text value, defaulting to blank.
pub(crate) fn optional_text(values: &FieldValues, name: &str) -> String {
    values.text(name).unwrap_or_default().to_string()
}
