//! Document sessions
//!
//! A session owns one figure document, the editor selection and the
//! document's archive resources, and saves them through an injected
//! `ArchiveStore`.
//!
//! Sync states for the held document:
//!
//! ```text
//! Unsynced --save--> Syncing --ok--> Synced
//!                       |
//!                       +--error--> Unsynced
//! Synced --edit--> Unsynced
//! ```
//!
//! Reads are independent retrievals and never move a held document between
//! states; opening a document creates a new session.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::archive::{Archive, ArchiveResource, ArchiveStore, WriteAck};
use crate::editing::{EditorSelection, SelectionHolder, ToolState};
use crate::error::{ManuscriptError, Result};
use crate::figure::FigureModel;

/// Synchronization state of a held document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Unsynced,
    Syncing,
    Synced,
}

impl std::fmt::Display for SyncState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncState::Unsynced => write!(f, "unsynced"),
            SyncState::Syncing => write!(f, "syncing"),
            SyncState::Synced => write!(f, "synced"),
        }
    }
}

/// Things that happen to a held document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncEvent {
    Edit,
    BeginWrite,
    WriteSucceeded,
    WriteFailed,
}

impl std::fmt::Display for SyncEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncEvent::Edit => write!(f, "edit"),
            SyncEvent::BeginWrite => write!(f, "begin write"),
            SyncEvent::WriteSucceeded => write!(f, "complete write"),
            SyncEvent::WriteFailed => write!(f, "fail write"),
        }
    }
}

impl SyncState {
    /// Next state after `event`, or an error if the transition isn't allowed
    pub fn apply(self, event: SyncEvent) -> Result<SyncState> {
        use SyncEvent::*;
        use SyncState::*;

        match (self, event) {
            (Unsynced | Synced, Edit) => Ok(Unsynced),
            (Unsynced | Synced, BeginWrite) => Ok(Syncing),
            (Syncing, WriteSucceeded) => Ok(Synced),
            (Syncing, WriteFailed) => Ok(Unsynced),
            (from, event) => Err(ManuscriptError::InvalidSyncTransition {
                from: from.to_string(),
                event: event.to_string(),
            }),
        }
    }
}

/// An open figure document
pub struct DocumentSession<S> {
    store: S,
    archive_id: Option<String>,
    figure: FigureModel,
    selection: EditorSelection,
    resources: BTreeMap<String, ArchiveResource>,
    state: SyncState,
    last_synced_at: Option<DateTime<Utc>>,
}

impl<S: ArchiveStore> DocumentSession<S> {
    /// Start a new, not yet created document
    pub fn new(store: S, figure: FigureModel) -> Self {
        Self {
            store,
            archive_id: None,
            figure,
            selection: EditorSelection::new(),
            resources: BTreeMap::new(),
            state: SyncState::Unsynced,
            last_synced_at: None,
        }
    }

    /// Open an existing document from the store
    pub async fn open(store: S, archive_id: &str) -> Result<Self> {
        let raw = store.read(Some(archive_id)).await?;
        let archive = Archive::from_raw(&raw)?;

        let figure = if archive.body().is_null() {
            FigureModel::default()
        } else {
            archive.body_as()?
        };
        let id = archive
            .id()
            .map(str::to_string)
            .unwrap_or_else(|| archive_id.to_string());
        let (_, resources, _) = archive.into_inner();

        info!(archive = %id, panels = figure.len(), "opened document");
        Ok(Self {
            store,
            archive_id: Some(id),
            figure,
            selection: EditorSelection::new(),
            resources,
            state: SyncState::Synced,
            last_synced_at: None,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn archive_id(&self) -> Option<&str> {
        self.archive_id.as_deref()
    }

    pub fn figure(&self) -> &FigureModel {
        &self.figure
    }

    pub fn selection(&self) -> &EditorSelection {
        &self.selection
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn last_synced_at(&self) -> Option<DateTime<Utc>> {
        self.last_synced_at
    }

    pub fn resources(&self) -> &BTreeMap<String, ArchiveResource> {
        &self.resources
    }

    /// Tool enablement for the current selection
    pub fn tools(&self) -> ToolState {
        ToolState::derive(&self.figure, self.selection.selection())
    }

    /// Run an edit against the figure and selection.
    ///
    /// A successful edit marks the document unsynced.
    pub fn edit<T>(
        &mut self,
        command: impl FnOnce(&mut FigureModel, &mut EditorSelection) -> Result<T>,
    ) -> Result<T> {
        self.settle_abandoned_save();
        let next = self.state.apply(SyncEvent::Edit)?;

        let output = command(&mut self.figure, &mut self.selection)?;
        self.state = next;
        Ok(output)
    }

    /// Add or replace a resource
    pub fn insert_resource(
        &mut self,
        path: impl Into<String>,
        resource: ArchiveResource,
    ) -> Result<Option<ArchiveResource>> {
        self.settle_abandoned_save();
        let next = self.state.apply(SyncEvent::Edit)?;

        let previous = self.resources.insert(path.into(), resource);
        self.state = next;
        Ok(previous)
    }

    /// A save holds `&mut self` until it finishes, so Syncing seen here
    /// means its future was dropped mid-write.
    fn settle_abandoned_save(&mut self) {
        if self.state == SyncState::Syncing {
            warn!("previous save never completed; document is unsynced");
            self.state = SyncState::Unsynced;
        }
    }

    /// Snapshot the document as an archive
    pub fn to_archive(&self) -> Result<Archive> {
        let mut archive = Archive::new();
        archive.set_id(self.archive_id.clone());
        archive.set_body_from(&self.figure)?;
        for (path, resource) in &self.resources {
            archive.insert_resource(path.clone(), resource.clone());
        }
        Ok(archive)
    }

    /// Write the document to the store.
    ///
    /// Creates the document when it has no id yet and adopts the id the
    /// store reports. On failure the document stays unsynced and the error
    /// is returned; nothing is retried.
    pub async fn save(&mut self) -> Result<WriteAck> {
        self.settle_abandoned_save();

        let archive = self.to_archive()?;
        self.state = self.state.apply(SyncEvent::BeginWrite)?;

        let result = self.store.write(self.archive_id.as_deref(), archive).await;
        match result {
            Ok(ack) => {
                self.state = self.state.apply(SyncEvent::WriteSucceeded)?;
                if self.archive_id.is_none() {
                    self.archive_id = ack.archive_id();
                    if self.archive_id.is_none() {
                        warn!(
                            status = ack.status,
                            "store reported no archive id; the next save creates a new archive"
                        );
                    }
                }
                self.last_synced_at = Some(ack.acknowledged_at);
                info!(archive = ?self.archive_id, status = ack.status, "saved document");
                Ok(ack)
            }
            Err(e) => {
                self.state = self.state.apply(SyncEvent::WriteFailed)?;
                warn!(error = %e, "save failed");
                Err(e)
            }
        }
    }
}
