//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use log::{info, warn};

use crate::archive::{load_dir, Archive, ArchiveStore, HttpStorageClient};
use crate::config::StorageConfig;
use crate::error::{ManuscriptError, Result};
use crate::figure::FigureModel;

/// Resolve storage settings: config file or environment, then `--endpoint`.
pub fn storage_config(endpoint: Option<&str>, config_file: Option<&Path>) -> Result<StorageConfig> {
    let mut config = match config_file {
        Some(path) => StorageConfig::load(path)?,
        None => StorageConfig::from_env()?,
    };
    if let Some(endpoint) = endpoint {
        config.endpoint = endpoint.to_string();
        config.validate()?;
    }
    Ok(config)
}

/// Fetch an archive and print it.
pub async fn read(config: StorageConfig, id: Option<&str>) -> Result<()> {
    info!("Reading archive from: {}", config.archive_url(id));

    let client = HttpStorageClient::new(config)?;
    let raw = client.read(id).await?;

    println!("{}", serde_json::to_string_pretty(&raw)?);
    Ok(())
}

/// Write an archive folder.
pub async fn write(config: StorageConfig, dir: &Path, id: Option<&str>) -> Result<()> {
    info!("Loading archive folder: {}", dir.display());

    let mut archive = load_dir(dir)?;
    archive.set_id(id.map(str::to_string));
    if archive.body().is_null() {
        warn!("No manuscript.json in {}; writing an empty body", dir.display());
    }

    let resource_count = archive.resources().len();
    let client = HttpStorageClient::new(config)?;
    let ack = client.write(id, archive).await?;

    println!(
        "Archive written ({} resources), status {}",
        resource_count, ack.status
    );
    if let Some(new_id) = ack.archive_id() {
        println!("Archive id: {}", new_id);
    }
    Ok(())
}

/// Print the figure of a raw archive file.
pub fn inspect(file: &Path) -> Result<()> {
    info!("Inspecting archive file: {}", file.display());

    let content = fs::read_to_string(file).map_err(|e| ManuscriptError::FileReadError {
        path: file.to_path_buf(),
        source: e,
    })?;
    let raw = serde_json::from_str(&content)?;
    let archive = Archive::from_raw(&raw)?;
    let figure: FigureModel = archive.body_as()?;

    if let Some(id) = archive.id() {
        println!("Archive: {}", id);
    }
    println!("Resources: {}", archive.resources().len());
    print!("{}", describe_figure(&figure));
    Ok(())
}

/// Human-readable listing of a figure's panels and fields
pub fn describe_figure(figure: &FigureModel) -> String {
    let mut out = String::new();

    if figure.is_empty() {
        out.push_str("Figure has no panels\n");
        return out;
    }

    for (i, panel) in figure.panels().iter().enumerate() {
        let marker = if i == figure.current_panel_index() {
            " (current)"
        } else {
            ""
        };
        let _ = writeln!(out, "Panel {}{}", i + 1, marker);
        for field in panel.fields() {
            let _ = writeln!(out, "  {}: {}", field.name(), field.value());
        }
    }
    out
}
