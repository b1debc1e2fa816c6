//! Form state behind the create/edit dialog of every entity.
//!
//! The form is keyed by field name and knows nothing about the backend: it
//! validates locally and hands a [`Record`] to whoever submits it.

use std::{collections::BTreeMap, future::Future};

use serde_json::{Number, Value};

use super::{
    data_service::{Record, record_id},
    entity_schema::{EntitySchema, FieldKind},
};

/// Message shown under a required field left empty.
pub const REQUIRED_MESSAGE: &str = "Required";

/// Current string value of each field, by field name.
pub type FormValues = BTreeMap<String, String>;

/// Validation message of each invalid field, by field name.
pub type FieldErrors = BTreeMap<String, String>;

/// Check that every required field holds a non-empty trimmed value.
pub fn validate(schema: &EntitySchema, values: &FormValues) -> FieldErrors {
    schema
        .required_fields()
        .filter(|field| {
            values
                .get(field.name)
                .is_none_or(|value| value.trim().is_empty())
        })
        .map(|field| (field.name.to_string(), REQUIRED_MESSAGE.to_string()))
        .collect()
}

#[derive(Debug, Clone)]
pub struct EntityForm {
    schema: &'static EntitySchema,
    values: FormValues,
    errors: FieldErrors,
    record_id: Option<String>,
    open: bool,
}

impl EntityForm {
    /// A closed, empty form.
    pub fn new(schema: &'static EntitySchema) -> Self {
        Self {
            schema,
            values: FormValues::new(),
            errors: FieldErrors::new(),
            record_id: None,
            open: false,
        }
    }

    /// Open the form for creating (`None`) or editing (`Some(row)`).
    pub fn opened(schema: &'static EntitySchema, initial: Option<&Record>) -> Self {
        let mut form = Self::new(schema);
        form.open(initial);
        form
    }

    /// Rebuild a form from values posted by the browser.
    pub fn from_submission(
        schema: &'static EntitySchema,
        record_id: Option<String>,
        submitted: FormValues,
    ) -> Self {
        let values = submitted
            .into_iter()
            .filter(|(name, _)| schema.field(name).is_some())
            .collect();
        Self {
            schema,
            values,
            errors: FieldErrors::new(),
            record_id,
            open: true,
        }
    }

    /// Reset the values from `initial` and open the dialog. Only fields of the
    /// schema are taken from `initial`; its `id` is kept so the submission can
    /// be routed to an update.
    pub fn open(&mut self, initial: Option<&Record>) {
        self.values = initial
            .map(|row| {
                self.schema
                    .fields
                    .iter()
                    .filter_map(|field| {
                        let value = display_value(row.get(field.name)?)?;
                        Some((field.name.to_string(), value))
                    })
                    .collect()
            })
            .unwrap_or_default();
        self.record_id = initial.and_then(record_id);
        self.errors.clear();
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn schema(&self) -> &'static EntitySchema {
        self.schema
    }

    pub fn record_id(&self) -> Option<&str> {
        self.record_id.as_deref()
    }

    pub fn is_edit(&self) -> bool {
        self.record_id.is_some()
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// Current value of `name`, empty when unset.
    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    /// Change one field. Any error on that field is cleared right away,
    /// whether or not the new value is valid.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_string(), value.into());
        self.errors.remove(name);
    }

    /// Run validation, replacing the current errors. Returns true when valid.
    pub fn validate(&mut self) -> bool {
        self.errors = validate(self.schema, &self.values);
        self.errors.is_empty()
    }

    /// Validate and, if valid, produce the record to submit.
    pub fn prepare_submit(&mut self) -> Option<Record> {
        self.validate().then(|| self.to_record())
    }

    /// Validate, then hand the record to `on_submit` and wait for it before
    /// closing. Returns false, without calling `on_submit`, when invalid.
    pub async fn submit<F, Fut>(&mut self, on_submit: F) -> bool
    where
        F: FnOnce(Record) -> Fut,
        Fut: Future<Output = ()>,
    {
        let Some(record) = self.prepare_submit() else {
            return false;
        };
        on_submit(record).await;
        self.close();
        true
    }

    /// Every schema field as a backend value: numbers that parse are sent as
    /// numbers, empty optional fields as null. The `id` is included when editing.
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        if let Some(id) = &self.record_id {
            record.insert("id".to_string(), Value::String(id.clone()));
        }
        for field in self.schema.fields {
            let raw = self.value(field.name);
            let value = if raw.trim().is_empty() && !field.required {
                Value::Null
            } else {
                match field.kind {
                    FieldKind::Number => number_value(raw),
                    _ => Value::String(raw.to_string()),
                }
            };
            record.insert(field.name.to_string(), value);
        }
        record
    }
}

fn number_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Value::Number(n.into());
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(raw.to_string()))
}

/// How a backend value appears in a form input; null means "unset".
fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
