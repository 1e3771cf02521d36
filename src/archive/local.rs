//! Archive folders on disk
//!
//! Layout:
//! - `manuscript.json` is the document body
//! - any other `*.json` file is a JSON resource
//! - everything else is a blob resource
//!
//! Resources are keyed by their path relative to the folder, with `/` as
//! separator.

use std::fs;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use super::document::Archive;
use super::resource::ArchiveResource;
use crate::error::{ManuscriptError, Result};

/// File holding the document body
pub const BODY_FILE: &str = "manuscript.json";

/// Build an archive from the files under `dir`
pub fn load_dir(dir: &Path) -> Result<Archive> {
    if !dir.is_dir() {
        return Err(ManuscriptError::InvalidArchive {
            reason: format!("{} is not a directory", dir.display()),
        });
    }

    let mut archive = Archive::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| ManuscriptError::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path
            .strip_prefix(dir)
            .map_err(|_| ManuscriptError::InvalidArchive {
                reason: format!("{} escapes {}", path.display(), dir.display()),
            })?
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");

        let bytes = fs::read(path).map_err(|e| ManuscriptError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        if relative == BODY_FILE {
            archive.set_body(serde_json::from_slice(&bytes)?);
            continue;
        }

        let is_json = path.extension().map_or(false, |ext| ext == "json");
        let resource = if is_json {
            ArchiveResource::json(ArchiveResource::generate_id(), serde_json::from_slice(&bytes)?)
        } else {
            ArchiveResource::blob(ArchiveResource::generate_id(), bytes)
        };
        debug!(path = %relative, encoding = %resource.encoding(), "loaded resource");
        archive.insert_resource(relative, resource);
    }

    Ok(archive)
}
