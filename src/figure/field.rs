//! Metadata fields
//!
//! A field is a name/value pair attached to a figure panel, e.g. a keyword
//! group label and its keywords. The name is fixed once the field exists;
//! only the value is edited afterwards.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Value of a metadata field: a single string or an ordered list of strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// The empty value new fields start with
    pub fn empty() -> Self {
        FieldValue::Text(String::new())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::List(items) => items.iter().all(|item| item.is_empty()),
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        Self::empty()
    }
}

/// Lists render as their entries joined with ", "
impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Text(text) => write!(f, "{}", text),
            FieldValue::List(items) => write!(f, "{}", items.join(", ")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Text(text.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        FieldValue::Text(text)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(items: Vec<&str>) -> Self {
        FieldValue::List(items.into_iter().map(str::to_string).collect())
    }
}

/// A named metadata field.
///
/// The `id` is only a handle for UI addressing; fields are identified by
/// their position within the owning panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataField {
    #[serde(default = "generate_field_id")]
    id: String,
    name: String,
    #[serde(default)]
    value: FieldValue,
}

fn generate_field_id() -> String {
    Uuid::new_v4().to_string()
}

impl MetadataField {
    /// Create a field with a generated id
    pub fn new(name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            id: generate_field_id(),
            name: name.into(),
            value: value.into(),
        }
    }

    /// Create a field from a template: template name, empty value
    pub fn from_template(template: &FieldTemplate) -> Self {
        Self::new(template.name.clone(), FieldValue::empty())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<FieldValue>) {
        self.value = value.into();
    }
}

/// Shape of a field to be created; carries no value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldTemplate {
    pub name: String,
}

impl FieldTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
