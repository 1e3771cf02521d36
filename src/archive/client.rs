//! Archive stores
//!
//! `ArchiveStore` is the seam between a document session and wherever
//! archives live. `HttpStorageClient` talks to a remote endpoint:
//!
//! - read:  `GET <endpoint>[/<id>]`, JSON response body
//! - write: `PUT <endpoint>[/<id>]`, multipart body with one part per blob
//!   and the JSON envelope under `_archive`
//!
//! Neither operation retries; a failure is returned to the caller as
//! `ManuscriptError::ArchiveIo` with the underlying cause.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info};

use super::document::Archive;
use super::parts::TransmissionParts;
use crate::config::StorageConfig;
use crate::error::{ArchiveIoCause, ArchiveOperation, ManuscriptError, Result};

/// Server acknowledgement of a write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteAck {
    pub status: u16,
    pub body: String,
    pub acknowledged_at: DateTime<Utc>,
}

impl WriteAck {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            acknowledged_at: Utc::now(),
        }
    }

    /// The archive id reported by the server, if the body is a JSON object
    /// with a string `id`
    pub fn archive_id(&self) -> Option<String> {
        let value: Value = serde_json::from_str(&self.body).ok()?;
        value.get("id")?.as_str().map(str::to_string)
    }
}

/// Reads and writes archives
#[allow(async_fn_in_trait)]
pub trait ArchiveStore {
    /// Fetch the raw archive for `archive_id`
    async fn read(&self, archive_id: Option<&str>) -> Result<Value>;

    /// Persist `archive`, creating it when `archive_id` is None
    async fn write(&self, archive_id: Option<&str>, archive: Archive) -> Result<WriteAck>;
}

/// Archive store backed by an HTTP endpoint
#[derive(Debug, Clone)]
pub struct HttpStorageClient {
    config: StorageConfig,
    client: reqwest::Client,
}

impl HttpStorageClient {
    pub fn new(config: StorageConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder().default_headers(config.header_map()?);
        if let Some(timeout_ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let client = builder.build().map_err(|e| ManuscriptError::InvalidConfig {
            reason: format!("cannot build HTTP client: {}", e),
        })?;

        Ok(Self { config, client })
    }

    /// Create a client from `MANUSCRIPT_ARCHIVE_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(StorageConfig::from_env()?)
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }
}

fn io_error(operation: ArchiveOperation, url: &str, source: ArchiveIoCause) -> ManuscriptError {
    ManuscriptError::ArchiveIo {
        operation,
        url: url.to_string(),
        source,
    }
}

/// Read the body and fail on a non-success status
async fn checked_body(
    operation: ArchiveOperation,
    url: &str,
    response: reqwest::Response,
) -> Result<(u16, String)> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| io_error(operation, url, e.into()))?;

    if !status.is_success() {
        return Err(io_error(
            operation,
            url,
            ArchiveIoCause::Status {
                status: status.as_u16(),
                body,
            },
        ));
    }
    Ok((status.as_u16(), body))
}

impl ArchiveStore for HttpStorageClient {
    async fn read(&self, archive_id: Option<&str>) -> Result<Value> {
        let url = self.config.archive_url(archive_id);
        debug!(%url, "reading archive");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| io_error(ArchiveOperation::Read, &url, e.into()))?;
        let (_, body) = checked_body(ArchiveOperation::Read, &url, response).await?;

        serde_json::from_str(&body)
            .map_err(|e| io_error(ArchiveOperation::Read, &url, ArchiveIoCause::MalformedJson(e)))
    }

    async fn write(&self, archive_id: Option<&str>, archive: Archive) -> Result<WriteAck> {
        let url = self.config.archive_url(archive_id);
        let parts = TransmissionParts::from_archive(archive)?;
        info!(
            %url,
            blobs = parts.blobs.len(),
            envelope_bytes = parts.archive_json.len(),
            "writing archive"
        );

        let response = self
            .client
            .put(&url)
            .multipart(parts.into_form())
            .send()
            .await
            .map_err(|e| io_error(ArchiveOperation::Write, &url, e.into()))?;
        let (status, body) = checked_body(ArchiveOperation::Write, &url, response).await?;

        Ok(WriteAck::new(status, body))
    }
}
