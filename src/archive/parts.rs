//! Transmission parts
//!
//! Splits an archive into one binary part per local blob and a single JSON
//! envelope. Blob bytes are moved out of the archive, never copied into the
//! envelope.

use reqwest::multipart::{Form, Part};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::document::{Archive, ArchiveEnvelope};
use super::resource::ResourcePayload;
use crate::error::Result;

/// Name of the multipart field carrying the JSON envelope
pub const ARCHIVE_PART: &str = "_archive";

/// Binary payload of one blob resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobPart {
    /// Resource id; used as the part name
    pub key: String,
    /// Resource path; used as the part's filename
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl BlobPart {
    /// SHA-256 of the payload, hex encoded
    pub fn checksum(&self) -> String {
        format!("{:x}", Sha256::digest(&self.bytes))
    }
}

/// An archive ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransmissionParts {
    pub blobs: Vec<BlobPart>,
    pub archive_json: String,
}

impl TransmissionParts {
    pub fn from_archive(archive: Archive) -> Result<Self> {
        let (id, resources, body) = archive.into_inner();
        let mut envelope = ArchiveEnvelope {
            id,
            body,
            ..ArchiveEnvelope::default()
        };
        let mut blobs = Vec::new();

        for (path, resource) in resources {
            envelope.resources.insert(path.clone(), resource.record());
            let key = resource.id().to_string();

            if let ResourcePayload::Blob(bytes) = resource.into_payload() {
                let part = BlobPart {
                    key,
                    file_name: path,
                    bytes,
                };
                debug!(
                    resource = %part.key,
                    path = %part.file_name,
                    bytes = part.bytes.len(),
                    sha256 = %part.checksum(),
                    "extracted blob part"
                );
                blobs.push(part);
            }
        }

        let archive_json = serde_json::to_string(&envelope)?;
        Ok(Self {
            blobs,
            archive_json,
        })
    }

    /// Build the multipart body: blob parts first, then the envelope
    pub fn into_form(self) -> Form {
        let mut form = Form::new();
        for blob in self.blobs {
            form = form.part(blob.key, Part::bytes(blob.bytes).file_name(blob.file_name));
        }
        form.text(ARCHIVE_PART, self.archive_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::ArchiveResource;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    #[test]
    fn test_blob_split_out_of_envelope() {
        let mut archive = Archive::new();
        archive.insert_resource("img.png", ArchiveResource::blob("r1", PNG_BYTES.to_vec()));

        let parts = TransmissionParts::from_archive(archive).unwrap();

        assert_eq!(
            parts.blobs,
            vec![BlobPart {
                key: "r1".to_string(),
                file_name: "img.png".to_string(),
                bytes: PNG_BYTES.to_vec(),
            }]
        );

        let envelope: Value = serde_json::from_str(&parts.archive_json).unwrap();
        assert_eq!(
            envelope["resources"]["img.png"],
            json!({"id": "r1", "encoding": "blob"})
        );
    }

    #[test]
    fn test_json_resources_and_body_stay_in_envelope() {
        let mut archive = Archive::with_id("doc-7");
        archive.set_body(json!({"panels": []}));
        archive.insert_resource(
            "manifest.json",
            ArchiveResource::json("m1", json!({"title": "Figure 1"})),
        );
        archive.insert_resource("img.png", ArchiveResource::blob("r1", vec![1, 2, 3]));

        let parts = TransmissionParts::from_archive(archive).unwrap();
        let envelope: Value = serde_json::from_str(&parts.archive_json).unwrap();

        assert_eq!(parts.blobs.len(), 1);
        assert_eq!(
            envelope,
            json!({
                "id": "doc-7",
                "resources": {
                    "img.png": {"id": "r1", "encoding": "blob"},
                    "manifest.json": {"id": "m1", "encoding": "json", "data": {"title": "Figure 1"}}
                },
                "body": {"panels": []}
            })
        );
    }

    #[test]
    fn test_remote_blob_sends_no_part() {
        let mut archive = Archive::new();
        archive.insert_resource(
            "img.png",
            ArchiveResource::remote_blob("r1", Some("https://cdn/img.png".to_string())),
        );

        let parts = TransmissionParts::from_archive(archive).unwrap();
        let envelope: Value = serde_json::from_str(&parts.archive_json).unwrap();

        assert!(parts.blobs.is_empty());
        assert_eq!(
            envelope["resources"]["img.png"],
            json!({"id": "r1", "encoding": "blob", "location": "https://cdn/img.png"})
        );
    }

    #[test]
    fn test_read_blob_content_not_resent() {
        let raw = json!({
            "resources": {"img.png": {"id": "r1", "encoding": "blob", "data": "iVBORw0KGgo="}},
            "body": null
        });
        let archive = Archive::from_raw(&raw).unwrap();

        let parts = TransmissionParts::from_archive(archive).unwrap();
        let envelope: Value = serde_json::from_str(&parts.archive_json).unwrap();

        assert!(parts.blobs.is_empty());
        assert_eq!(
            envelope["resources"]["img.png"],
            json!({"id": "r1", "encoding": "blob"})
        );
    }

    #[test]
    fn test_checksum() {
        let part = BlobPart {
            key: "r1".to_string(),
            file_name: "empty.bin".to_string(),
            bytes: Vec::new(),
        };
        assert_eq!(
            part.checksum(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
