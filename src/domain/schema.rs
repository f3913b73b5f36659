//! Declarative entity schemas.
//!
//! Each entity is described once as an [`EntitySchema`]: an ordered list of
//! [`FieldSpec`]s naming the field, its storage column, its label, its
//! [`FieldKind`] and whether it is required. JSON cleaning, form binding,
//! form rendering and SQL generation are all derived from these tables.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::RecordId;

/// The persisted record types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A blog author.
    Author,
    /// A blog post written by one author.
    Post,
}

impl EntityKind {
    /// Lower-case singular name, used in logs and messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::Post => "post",
        }
    }

    /// Field table of the entity.
    #[must_use]
    pub const fn schema(self) -> &'static EntitySchema {
        match self {
            Self::Author => &super::author::AUTHOR_SCHEMA,
            Self::Post => &super::post::POST_SCHEMA,
        }
    }

    /// Human-readable singular name, used in page headings.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Author => "Author",
            Self::Post => "Post",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Type and validation rule of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single-line text with a maximum length in characters.
    ShortText {
        /// Maximum length in characters.
        max_length: usize,
    },
    /// Unbounded multi-line text.
    LongText,
    /// E-mail address.
    Email {
        /// Maximum length in characters.
        max_length: usize,
    },
    /// Telephone number.
    Phone {
        /// Maximum length in characters.
        max_length: usize,
    },
    /// Primary key of a record of another entity.
    Reference(EntityKind),
}

impl FieldKind {
    /// HTML widget used to render the field in a form.
    #[must_use]
    pub const fn widget(self) -> &'static str {
        match self {
            Self::ShortText { .. } => "text",
            Self::LongText => "textarea",
            Self::Email { .. } => "email",
            Self::Phone { .. } => "tel",
            Self::Reference(_) => "select",
        }
    }

    /// Maximum length in characters, if the kind is bounded.
    #[must_use]
    pub const fn max_length(self) -> Option<usize> {
        match self {
            Self::ShortText { max_length }
            | Self::Email { max_length }
            | Self::Phone { max_length } => Some(max_length),
            Self::LongText | Self::Reference(_) => None,
        }
    }
}

/// One declared field of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Wire and form name.
    pub name: &'static str,
    /// Storage column name.
    pub column: &'static str,
    /// Form label.
    pub label: &'static str,
    /// Type and validation rule.
    pub kind: FieldKind,
    /// Whether a value must be supplied.
    pub required: bool,
}

/// Complete field table of one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySchema {
    /// Entity described by this schema.
    pub kind: EntityKind,
    /// Storage table name.
    pub table: &'static str,
    /// Writable fields in display order. The `id` field is implicit.
    pub fields: &'static [FieldSpec],
}

impl EntitySchema {
    /// Looks up a declared field by wire name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Storage column for a wire field name; `id` maps to itself.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&'static str> {
        if name == "id" {
            return Some("id");
        }
        self.field(name).map(|f| f.column)
    }

    /// `id` followed by every field column, in declaration order.
    #[must_use]
    pub fn column_list(&self) -> String {
        std::iter::once("id")
            .chain(self.fields.iter().map(|f| f.column))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `SELECT` of every column, without a `WHERE` or `ORDER BY` clause.
    #[must_use]
    pub fn select_sql(&self) -> String {
        format!("SELECT {} FROM {}", self.column_list(), self.table)
    }

    /// `INSERT` binding the fields as `$1..$n` in declaration order and
    /// returning the stored row.
    #[must_use]
    pub fn insert_sql(&self) -> String {
        let columns: Vec<&str> = self.fields.iter().map(|f| f.column).collect();
        let params: Vec<String> = (1..=self.fields.len()).map(|i| format!("${i}")).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            self.table,
            columns.join(", "),
            params.join(", "),
            self.column_list()
        )
    }

    /// `UPDATE` binding the fields as `$1..$n` in declaration order and the
    /// id as `$n+1`, returning the stored row.
    #[must_use]
    pub fn update_sql(&self) -> String {
        let assignments: Vec<String> = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, f)| format!("{} = ${}", f.column, i + 1))
            .collect();
        format!(
            "UPDATE {} SET {} WHERE id = ${} RETURNING {}",
            self.table,
            assignments.join(", "),
            self.fields.len() + 1,
            self.column_list()
        )
    }

    /// Fields that point at other entities.
    pub fn references(&self) -> impl Iterator<Item = (&FieldSpec, EntityKind)> {
        self.fields.iter().filter_map(|f| match f.kind {
            FieldKind::Reference(target) => Some((f, target)),
            _ => None,
        })
    }
}

/// A cleaned field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Text, already trimmed and validated. Blank for optional fields left empty.
    Text(String),
    /// Identifier of a referenced record.
    Reference(RecordId),
}

impl FieldValue {
    /// Form representation of the value.
    #[must_use]
    pub fn to_form_string(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Reference(id) => id.to_string(),
        }
    }
}

/// Cleaned values keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues(BTreeMap<&'static str, FieldValue>);

impl FieldValues {
    /// Creates an empty value set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `name`, replacing any previous value.
    pub fn insert(&mut self, name: &'static str, value: FieldValue) {
        self.0.insert(name, value);
    }

    /// Builder-style [`FieldValues::insert`] for text.
    #[must_use]
    pub fn with_text(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.insert(name, FieldValue::Text(value.into()));
        self
    }

    /// Builder-style [`FieldValues::insert`] for references.
    #[must_use]
    pub fn with_reference(mut self, name: &'static str, id: RecordId) -> Self {
        self.insert(name, FieldValue::Reference(id));
        self
    }

    /// Text stored under `name`.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(FieldValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Reference stored under `name`.
    #[must_use]
    pub fn reference(&self, name: &str) -> Option<RecordId> {
        match self.0.get(name) {
            Some(FieldValue::Reference(id)) => Some(*id),
            _ => None,
        }
    }

    /// Overwrites `self` with every value present in `changes`.
    pub fn apply(&mut self, changes: Self) {
        self.0.extend(changes.0);
    }

    /// Iterates over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: EntitySchema = EntitySchema {
        kind: EntityKind::Post,
        table: "sample",
        fields: &[
            FieldSpec {
                name: "title",
                column: "title",
                label: "Title",
                kind: FieldKind::ShortText { max_length: 10 },
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

    #[test]
    fn columns_map_through_schema() {
        assert_eq!(SAMPLE.column("id"), Some("id"));
        assert_eq!(SAMPLE.column("author"), Some("author_id"));
        assert_eq!(SAMPLE.column("missing"), None);
    }

    #[test]
    fn sql_is_built_from_the_field_table() {
        assert_eq!(SAMPLE.select_sql(), "SELECT id, title, author_id FROM sample");
        assert_eq!(
            SAMPLE.insert_sql(),
            "INSERT INTO sample (title, author_id) VALUES ($1, $2) RETURNING id, title, author_id"
        );
        assert_eq!(
            SAMPLE.update_sql(),
            "UPDATE sample SET title = $1, author_id = $2 WHERE id = $3 RETURNING id, title, author_id"
        );
    }

    #[test]
    fn kinds_resolve_their_schema() {
        assert_eq!(EntityKind::Author.schema().table, "blog_author");
        assert_eq!(EntityKind::Post.schema().kind, EntityKind::Post);
    }

    #[test]
    fn references_lists_only_reference_fields() {
        let refs: Vec<_> = SAMPLE.references().map(|(f, k)| (f.name, k)).collect();
        assert_eq!(refs, vec![("author", EntityKind::Author)]);
    }

    #[test]
    fn widgets_follow_kind() {
        assert_eq!(FieldKind::LongText.widget(), "textarea");
        assert_eq!(FieldKind::Reference(EntityKind::Author).widget(), "select");
        assert_eq!(FieldKind::Email { max_length: 5 }.max_length(), Some(5));
        assert_eq!(FieldKind::LongText.max_length(), None);
    }

    #[test]
    fn apply_overwrites_only_supplied_values() {
        let mut base = FieldValues::new()
            .with_text("title", "old")
            .with_reference("author", RecordId::new(1));
        base.apply(FieldValues::new().with_text("title", "new"));
        assert_eq!(base.text("title"), Some("new"));
        assert_eq!(base.reference("author"), Some(RecordId::new(1)));
        assert_eq!(base.iter().count(), 2);
    }
}
