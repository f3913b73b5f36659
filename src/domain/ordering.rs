//! Explicit list orderings.
//!
//! Every list operation declares its [`ListOrder`]; nothing relies on an
//! implicit persistence default. The record id is always appended as the
//! final ascending tie-breaker so results are deterministic.

use std::cmp::Ordering;

use super::schema::EntitySchema;

/// Sort direction of one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

/// One key of a [`ListOrder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    /// Wire field name, or `id`.
    pub field: &'static str,
    /// Sort direction.
    pub direction: Direction,
}

impl SortKey {
    /// Ascending key on `field`.
    #[must_use]
    pub const fn asc(field: &'static str) -> Self {
        Self {
            field,
            direction: Direction::Ascending,
        }
    }

    /// Descending key on `field`.
    #[must_use]
    pub const fn desc(field: &'static str) -> Self {
        Self {
            field,
            direction: Direction::Descending,
        }
    }
}

/// Comparable projection of one field of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue<'a> {
    /// Integer value (ids and references).
    Int(i64),
    /// Text value.
    Text(&'a str),
}

/// Records that can be ordered field by field.
pub trait Sortable {
    /// Projects `field` for comparison; `id` must be supported.
    fn sort_value(&self, field: &str) -> SortValue<'_>;
}

/// Declared ordering of a list operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOrder {
    keys: &'static [SortKey],
}

impl ListOrder {
    /// Insertion order, i.e. ascending id.
    pub const INSERTION: Self = Self::new(&[]);

    /// Creates an ordering from its keys, most significant first.
    #[must_use]
    pub const fn new(keys: &'static [SortKey]) -> Self {
        Self { keys }
    }

    /// Compares two records under this ordering.
    pub fn compare<T: Sortable>(&self, a: &T, b: &T) -> Ordering {
        for key in self.keys {
            let ord = a.sort_value(key.field).cmp(&b.sort_value(key.field));
            let ord = match key.direction {
                Direction::Ascending => ord,
                Direction::Descending => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        a.sort_value("id").cmp(&b.sort_value("id"))
    }

    /// Sorts `records` in place.
    pub fn sort<T: Sortable>(&self, records: &mut [T]) {
        records.sort_by(|a, b| self.compare(a, b));
    }

    /// Renders an `ORDER BY` clause for `schema`'s table.
    ///
    /// Keys naming unknown fields are skipped; only declared column names
    /// ever reach the SQL text.
    #[must_use]
    pub fn to_sql(&self, schema: &EntitySchema) -> String {
        let mut parts: Vec<String> = self
            .keys
            .iter()
            .filter_map(|key| {
                let column = schema.column(key.field)?;
                let dir = match key.direction {
                    Direction::Ascending => "ASC",
                    Direction::Descending => "DESC",
                };
                Some(format!("{column} {dir}"))
            })
            .collect();
        if !self.keys.iter().any(|k| k.field == "id") {
            parts.push("id ASC".to_string());
        }
        format!("ORDER BY {}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::{EntityKind, FieldKind, FieldSpec};

    #[derive(Debug)]
    struct Row {
        id: i64,
        name: &'static str,
    }

    impl Sortable for Row {
        fn sort_value(&self, field: &str) -> SortValue<'_> {
            match field {
                "name" => SortValue::Text(self.name),
                _ => SortValue::Int(self.id),
            }
        }
    }

    const SCHEMA: EntitySchema = EntitySchema {
        kind: EntityKind::Author,
        table: "rows",
        fields: &[FieldSpec {
            name: "name",
            column: "full_name",
            label: "Name",
            kind: FieldKind::ShortText { max_length: 10 },
            required: true,
        }],
    };

    #[test]
    fn insertion_order_is_ascending_id() {
        let mut rows = vec![Row { id: 3, name: "a" }, Row { id: 1, name: "b" }];
        ListOrder::INSERTION.sort(&mut rows);
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn descending_key_reverses() {
        const NEWEST_FIRST: ListOrder = ListOrder::new(&[SortKey::desc("id")]);
        let mut rows = vec![
            Row { id: 1, name: "a" },
            Row { id: 3, name: "b" },
            Row { id: 2, name: "c" },
        ];
        NEWEST_FIRST.sort(&mut rows);
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[test]
    fn ties_break_on_id() {
        const BY_NAME: ListOrder = ListOrder::new(&[SortKey::asc("name")]);
        let mut rows = vec![
            Row { id: 5, name: "same" },
            Row { id: 2, name: "same" },
            Row { id: 9, name: "alpha" },
        ];
        BY_NAME.sort(&mut rows);
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![9, 2, 5]);
    }

    #[test]
    fn sql_uses_declared_columns() {
        const BY_NAME: ListOrder = ListOrder::new(&[SortKey::asc("name"), SortKey::asc("bogus")]);
        assert_eq!(BY_NAME.to_sql(&SCHEMA), "ORDER BY full_name ASC, id ASC");
        const NEWEST_FIRST: ListOrder = ListOrder::new(&[SortKey::desc("id")]);
        assert_eq!(NEWEST_FIRST.to_sql(&SCHEMA), "ORDER BY id DESC");
        assert_eq!(ListOrder::INSERTION.to_sql(&SCHEMA), "ORDER BY id ASC");
    }
}
