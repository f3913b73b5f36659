//! Form binding: an entity schema plus submitted values, errors and
//! reference choices, shaped for the generic form template.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{EntitySchema, FieldKind, FieldValues};
use crate::error::{BlogError, FieldErrors, NON_FIELD_ERRORS};
use crate::service::{BlogService, Choice};

/// Submitted form fields, keyed by input name.
pub type RawForm = HashMap<String, String>;

/// Reference choices keyed by field name.
pub type Choices = HashMap<&'static str, Vec<Choice>>;

/// One `<option>` of a select widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceOption {
    /// Submitted value.
    pub value: String,
    /// Visible text.
    pub label: String,
    /// Whether the option is pre-selected.
    pub selected: bool,
}

/// One rendered input with its value and messages.
#[derive(Debug, Clone, Serialize)]
pub struct BoundField {
    /// Input name.
    pub name: &'static str,
    /// Label text.
    pub label: &'static str,
    /// Input `type` for plain inputs.
    pub widget: &'static str,
    /// Whether the input is required.
    pub required: bool,
    /// Maximum length, if bounded.
    pub max_length: Option<usize>,
    /// Current value as text.
    pub value: String,
    /// Validation messages for this field.
    pub errors: Vec<String>,
    /// Options, for reference fields.
    pub choices: Vec<ChoiceOption>,
    /// Render as `<textarea>`.
    pub is_textarea: bool,
    /// Render as `<select>`.
    pub is_select: bool,
}

/// A complete form ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct BoundForm {
    /// Inputs in schema order.
    pub fields: Vec<BoundField>,
    /// Messages not tied to a single field.
    pub non_field_errors: Vec<String>,
}

impl BoundForm {
    /// Binds `raw` values and `errors` to the fields of `schema`.
    ///
    /// Submitted keys that are not declared fields are dropped.
    #[must_use]
    pub fn bind(
        schema: &EntitySchema,
        raw: &RawForm,
        errors: &FieldErrors,
        choices: &Choices,
    ) -> Self {
        let fields = schema
            .fields
            .iter()
            .map(|spec| {
                let value = raw.get(spec.name).cloned().unwrap_or_default();
                let options = choices
                    .get(spec.name)
                    .map(|list| {
                        list.iter()
                            .map(|c| {
                                let id = c.id.to_string();
                                ChoiceOption {
                                    selected: id == value.trim(),
                                    value: id,
                                    label: c.label.clone(),
                                }
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                BoundField {
                    name: spec.name,
                    label: spec.label,
                    widget: spec.kind.widget(),
                    required: spec.required,
                    max_length: spec.kind.max_length(),
                    value,
                    errors: errors.get(spec.name).to_vec(),
                    choices: options,
                    is_textarea: matches!(spec.kind, FieldKind::LongText),
                    is_select: matches!(spec.kind, FieldKind::Reference(_)),
                }
            })
            .collect();
        Self {
            fields,
            non_field_errors: errors.get(NON_FIELD_ERRORS).to_vec(),
        }
    }
}

/// Converts stored values into form text, for pre-filling edit forms.
#[must_use]
pub fn raw_from_values(values: &FieldValues) -> RawForm {
    values
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_form_string()))
        .collect()
}

/// Loads the options of every reference field of `schema`.
///
/// # Errors
///
/// Returns [`BlogError::Persistence`] on store failure.
pub async fn load_choices(
    service: &BlogService,
    schema: &EntitySchema,
) -> Result<Choices, BlogError> {
    let mut choices = Choices::new();
    for (field, target) in schema.references() {
        choices.insert(field.name, service.choices(target).await?);
    }
    Ok(choices)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{AUTHOR_SCHEMA, POST_SCHEMA, RecordId};

    fn author_choices() -> Choices {
        let mut choices = Choices::new();
        choices.insert(
            "author",
            vec![
                Choice {
                    id: RecordId::new(1),
                    label: "Ada Lovelace".to_string(),
                },
                Choice {
                    id: RecordId::new(2),
                    label: "Alan Turing".to_string(),
                },
            ],
        );
        choices
    }

    #[test]
    fn binds_fields_in_schema_order_with_widgets() {
        let form = BoundForm::bind(
            &AUTHOR_SCHEMA,
            &RawForm::new(),
            &FieldErrors::new(),
            &Choices::new(),
        );
        let names: Vec<&str> = form.fields.iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["first_name", "last_name", "email", "phone_number"]);
        let widgets: Vec<&str> = form.fields.iter().map(|f| f.widget).collect();
        assert_eq!(widgets, vec!["text", "text", "email", "tel"]);
        assert!(form.fields.iter().all(|f| f.errors.is_empty()));
        assert!(form.non_field_errors.is_empty());
    }

    #[test]
    fn selected_choice_follows_submitted_value() {
        let mut raw = RawForm::new();
        raw.insert("author".to_string(), "2".to_string());
        raw.insert("slug".to_string(), "ignored".to_string());
        let form = BoundForm::bind(&POST_SCHEMA, &raw, &FieldErrors::new(), &author_choices());
        let Some(author) = form.fields.iter().find(|f| f.name == "author") else {
            panic!("author field missing");
        };
        assert!(author.is_select);
        let selected: Vec<&str> = author
            .choices
            .iter()
            .filter(|c| c.selected)
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(selected, vec!["Alan Turing"]);
        assert!(form.fields.iter().all(|f| f.name != "slug"));
    }

    #[test]
    fn errors_attach_to_their_fields() {
        let errors = FieldErrors::single("title", "This field is required.");
        let form = BoundForm::bind(&POST_SCHEMA, &RawForm::new(), &errors, &author_choices());
        let Some(title) = form.fields.first() else {
            panic!("no fields");
        };
        assert_eq!(title.errors, vec!["This field is required.".to_string()]);
        assert!(form.fields.iter().any(|f| f.is_textarea));
    }

    #[test]
    fn stored_values_prefill_the_form() {
        let values = FieldValues::new()
            .with_text("title", "Hello")
            .with_reference("author", RecordId::new(5));
        let raw = raw_from_values(&values);
        assert_eq!(raw.get("title").map(String::as_str), Some("Hello"));
        assert_eq!(raw.get("author").map(String::as_str), Some("5"));
    }
}
