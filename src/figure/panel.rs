//! Figure panels

use serde::{Deserialize, Serialize};

use super::field::{FieldTemplate, MetadataField};

/// One panel of a figure: an ordered list of metadata fields.
///
/// Field order is significant and is the only ordering key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    #[serde(default)]
    fields: Vec<MetadataField>,
}

impl Panel {
    /// Create a panel with no fields
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Create a panel from existing fields
    pub fn with_fields(fields: Vec<MetadataField>) -> Self {
        Self { fields }
    }

    /// Build a panel from a template: same names, empty values
    pub fn from_template(template: &PanelTemplate) -> Self {
        Self {
            fields: template
                .fields
                .iter()
                .map(MetadataField::from_template)
                .collect(),
        }
    }

    pub fn fields(&self) -> &[MetadataField] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&MetadataField> {
        self.fields.get(index)
    }

    pub fn field_mut(&mut self, index: usize) -> Option<&mut MetadataField> {
        self.fields.get_mut(index)
    }

    pub(crate) fn fields_mut(&mut self) -> &mut Vec<MetadataField> {
        &mut self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Field structure of a panel without values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelTemplate {
    pub fields: Vec<FieldTemplate>,
}
