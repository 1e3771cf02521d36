//! Archive documents
//!
//! An archive is the persisted unit of a manuscript: the document body plus
//! resources keyed by path. An archive without an id has not been created
//! on the server yet.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::resource::{ArchiveResource, ResourceRecord};
use crate::error::{ManuscriptError, Result};

/// JSON envelope of an archive, as sent in the `_archive` part and
/// returned by a read
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct ArchiveEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceRecord>,
    #[serde(default)]
    pub body: Value,
}

/// A document archive
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Archive {
    id: Option<String>,
    resources: BTreeMap<String, ArchiveResource>,
    body: Value,
}

impl Archive {
    /// Create an archive for a document that doesn't exist remotely yet
    pub fn new() -> Self {
        Self {
            id: None,
            resources: BTreeMap::new(),
            body: Value::Null,
        }
    }

    /// Create an archive for an existing remote document
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::new()
        }
    }

    /// Parse a raw archive as returned by a read
    pub fn from_raw(raw: &Value) -> Result<Self> {
        let envelope: ArchiveEnvelope =
            serde_json::from_value(raw.clone()).map_err(|e| ManuscriptError::InvalidArchive {
                reason: e.to_string(),
            })?;

        let mut resources = BTreeMap::new();
        for (path, record) in envelope.resources {
            let resource = ArchiveResource::from_record(&path, record)?;
            resources.insert(path, resource);
        }

        Ok(Self {
            id: envelope.id,
            resources,
            body: envelope.body,
        })
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    pub fn resources(&self) -> &BTreeMap<String, ArchiveResource> {
        &self.resources
    }

    pub fn resource(&self, path: &str) -> Option<&ArchiveResource> {
        self.resources.get(path)
    }

    /// Add or replace the resource at `path`
    pub fn insert_resource(
        &mut self,
        path: impl Into<String>,
        resource: ArchiveResource,
    ) -> Option<ArchiveResource> {
        self.resources.insert(path.into(), resource)
    }

    pub fn remove_resource(&mut self, path: &str) -> Option<ArchiveResource> {
        self.resources.remove(path)
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn set_body(&mut self, body: Value) {
        self.body = body;
    }

    /// Store a serializable document as the body
    pub fn set_body_from<T: Serialize>(&mut self, document: &T) -> Result<()> {
        self.body = serde_json::to_value(document)?;
        Ok(())
    }

    /// Decode the body as a typed document
    pub fn body_as<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.body.clone())?)
    }

    pub(crate) fn into_inner(
        self,
    ) -> (Option<String>, BTreeMap<String, ArchiveResource>, Value) {
        (self.id, self.resources, self.body)
    }
}
