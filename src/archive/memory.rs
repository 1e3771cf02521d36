//! In-process archive store
//!
//! Keeps archives in memory, split the same way the HTTP store splits them
//! on the wire: the JSON envelope and the blob parts are stored separately.
//! Useful offline and as the store behind session tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use serde_json::{json, Value};
use tracing::debug;

use super::client::{ArchiveStore, WriteAck};
use super::document::Archive;
use super::parts::TransmissionParts;
use crate::error::{ArchiveIoCause, ArchiveOperation, ManuscriptError, Result};

#[derive(Debug, Clone, Default)]
struct StoredArchive {
    envelope: Value,
    /// Blob parts by resource id: (file name, bytes)
    blobs: BTreeMap<String, (String, Vec<u8>)>,
}

/// Archive store held in process memory
#[derive(Debug, Default)]
pub struct MemoryArchiveStore {
    archives: Mutex<HashMap<String, StoredArchive>>,
}

impl MemoryArchiveStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, StoredArchive>> {
        self.archives
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn contains(&self, archive_id: &str) -> bool {
        self.lock().contains_key(archive_id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Stored bytes of the blob part `resource_id`, with its file name
    pub fn blob(&self, archive_id: &str, resource_id: &str) -> Option<(String, Vec<u8>)> {
        self.lock()
            .get(archive_id)
            .and_then(|stored| stored.blobs.get(resource_id).cloned())
    }

    fn location(archive_id: Option<&str>) -> String {
        format!("memory://{}", archive_id.unwrap_or_default())
    }
}

impl ArchiveStore for MemoryArchiveStore {
    async fn read(&self, archive_id: Option<&str>) -> Result<Value> {
        let archives = self.lock();
        archive_id
            .and_then(|id| archives.get(id))
            .map(|stored| stored.envelope.clone())
            .ok_or_else(|| ManuscriptError::ArchiveIo {
                operation: ArchiveOperation::Read,
                url: Self::location(archive_id),
                source: ArchiveIoCause::Status {
                    status: 404,
                    body: "archive not found".to_string(),
                },
            })
    }

    async fn write(&self, archive_id: Option<&str>, archive: Archive) -> Result<WriteAck> {
        let parts = TransmissionParts::from_archive(archive)?;
        let mut envelope: Value = serde_json::from_str(&parts.archive_json)?;

        let (id, status) = match archive_id {
            Some(id) => (id.to_string(), 200),
            None => (uuid::Uuid::new_v4().to_string(), 201),
        };
        if let Value::Object(map) = &mut envelope {
            map.insert("id".to_string(), Value::String(id.clone()));
        }

        let blobs = parts
            .blobs
            .into_iter()
            .map(|blob| (blob.key, (blob.file_name, blob.bytes)))
            .collect();

        debug!(archive = %id, status, "stored archive in memory");
        self.lock().insert(id.clone(), StoredArchive { envelope, blobs });

        Ok(WriteAck::new(status, json!({ "id": id }).to_string()))
    }
}
