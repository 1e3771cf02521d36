//! Archive store configuration
//!
//! Settings come from a JSON file, the environment, or code:
//! - `MANUSCRIPT_ARCHIVE_URL`: endpoint (default `http://localhost:4000/archives`)
//! - `MANUSCRIPT_ARCHIVE_TIMEOUT_MS`: transport timeout, unset for none
//! - `MANUSCRIPT_ARCHIVE_TOKEN`: sent as `Authorization: Bearer <token>`

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::error::{ManuscriptError, Result};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:4000/archives";

const ENV_URL: &str = "MANUSCRIPT_ARCHIVE_URL";
const ENV_TIMEOUT_MS: &str = "MANUSCRIPT_ARCHIVE_TIMEOUT_MS";
const ENV_TOKEN: &str = "MANUSCRIPT_ARCHIVE_TOKEN";

/// Where and how to reach the archive store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Base endpoint; archive ids are appended as a path segment
    pub endpoint: String,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Transport timeout, handed to the HTTP client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl StorageConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            headers: BTreeMap::new(),
            timeout_ms: None,
        }
    }

    /// Read settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::new(lookup(ENV_URL).unwrap_or_else(|| DEFAULT_ENDPOINT.into()));

        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            let timeout_ms = raw.parse().map_err(|_| ManuscriptError::InvalidConfig {
                reason: format!("{} must be a number of milliseconds, got '{}'", ENV_TIMEOUT_MS, raw),
            })?;
            config.timeout_ms = Some(timeout_ms);
        }

        if let Some(token) = lookup(ENV_TOKEN) {
            config = config.with_header("Authorization", format!("Bearer {}", token));
        }

        config.validate()?;
        Ok(config)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ManuscriptError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: StorageConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ManuscriptError::InvalidConfig {
                reason: format!("endpoint must be an http(s) URL, got '{}'", self.endpoint),
            });
        }
        self.header_map()?;
        Ok(())
    }

    /// URL for an archive: the endpoint, plus `/<id>` when an id is given
    pub fn archive_url(&self, archive_id: Option<&str>) -> String {
        let base = self.endpoint.trim_end_matches('/');
        match archive_id {
            Some(id) => format!("{}/{}", base, id),
            None => base.to_string(),
        }
    }

    pub(crate) fn header_map(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| ManuscriptError::InvalidConfig {
                    reason: format!("invalid header name '{}': {}", name, e),
                })?;
            let value = HeaderValue::from_str(value).map_err(|e| ManuscriptError::InvalidConfig {
                reason: format!("invalid value for header '{}': {}", name, e),
            })?;
            headers.insert(name, value);
        }
        Ok(headers)
    }
}
