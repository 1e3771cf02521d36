//! Archive resources
//!
//! A resource is either structured JSON or a binary blob. Blob bytes never
//! go into the JSON envelope; only the record (id, encoding and an optional
//! server-side location) does.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{ManuscriptError, Result};

/// How a resource's payload is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    Json,
    Blob,
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Encoding::Json => write!(f, "json"),
            Encoding::Blob => write!(f, "blob"),
        }
    }
}

/// Payload of a resource
#[derive(Debug, Clone, PartialEq)]
pub enum ResourcePayload {
    /// Structured data, embedded in the envelope
    Json(Value),
    /// Binary data held locally, sent as its own part
    Blob(Vec<u8>),
    /// A blob known only by its record; the bytes live on the server
    RemoteBlob { location: Option<String> },
}

/// One stored artifact of an archive
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveResource {
    id: String,
    payload: ResourcePayload,
}

/// Envelope form of a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ResourceRecord {
    pub id: String,
    pub encoding: Encoding,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Server-side location of a blob's bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ArchiveResource {
    pub fn json(id: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            payload: ResourcePayload::Json(data),
        }
    }

    pub fn blob(id: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            payload: ResourcePayload::Blob(bytes),
        }
    }

    pub fn remote_blob(id: impl Into<String>, location: Option<String>) -> Self {
        Self {
            id: id.into(),
            payload: ResourcePayload::RemoteBlob { location },
        }
    }

    /// Generate a fresh resource id
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn encoding(&self) -> Encoding {
        match self.payload {
            ResourcePayload::Json(_) => Encoding::Json,
            ResourcePayload::Blob(_) | ResourcePayload::RemoteBlob { .. } => Encoding::Blob,
        }
    }

    pub fn payload(&self) -> &ResourcePayload {
        &self.payload
    }

    pub fn into_payload(self) -> ResourcePayload {
        self.payload
    }

    /// The envelope record; a blob record never carries `data`
    pub(crate) fn record(&self) -> ResourceRecord {
        let (data, location) = match &self.payload {
            ResourcePayload::Json(value) => (Some(value.clone()), None),
            ResourcePayload::Blob(_) => (None, None),
            ResourcePayload::RemoteBlob { location } => (None, location.clone()),
        };
        ResourceRecord {
            id: self.id.clone(),
            encoding: self.encoding(),
            data,
            location,
        }
    }

    /// Build a resource from a read record.
    ///
    /// String `data` on a blob record is content the server echoed back; it
    /// is dropped so it never travels in a later envelope. Any other inline
    /// `data` on a blob is malformed.
    pub(crate) fn from_record(path: &str, record: ResourceRecord) -> Result<Self> {
        match record.encoding {
            Encoding::Json => Ok(Self::json(record.id, record.data.unwrap_or(Value::Null))),
            Encoding::Blob => match record.data {
                None | Some(Value::String(_)) => Ok(Self::remote_blob(record.id, record.location)),
                Some(_) => Err(ManuscriptError::InvalidArchive {
                    reason: format!("blob resource '{}' carries inline data", path),
                }),
            },
        }
    }
}
