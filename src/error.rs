//! Error handling for Manuscript
//!
//! Structural errors are returned synchronously by the editing commands;
//! archive I/O errors come back through the async result of `read`/`write`.

use std::path::PathBuf;

use thiserror::Error;

use crate::editing::ListAddress;

/// Result type alias for Manuscript operations
pub type Result<T> = std::result::Result<T, ManuscriptError>;

/// Which side of the archive protocol failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveOperation {
    Read,
    Write,
}

impl std::fmt::Display for ArchiveOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArchiveOperation::Read => write!(f, "read"),
            ArchiveOperation::Write => write!(f, "write"),
        }
    }
}

/// Direction of a reorder command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

impl std::fmt::Display for MoveDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveDirection::Up => write!(f, "up"),
            MoveDirection::Down => write!(f, "down"),
        }
    }
}

/// Underlying cause of an archive I/O failure
#[derive(Error, Debug)]
pub enum ArchiveIoCause {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server responded with status {status}")]
    Status { status: u16, body: String },

    #[error("malformed archive JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),
}

/// Main error type for Manuscript operations
#[derive(Error, Debug)]
pub enum ManuscriptError {
    // Editing Errors
    #[error("Index {index} out of range for {list} (length {len})")]
    OutOfRange {
        list: ListAddress,
        index: usize,
        len: usize,
    },

    #[error("Cannot move entry {index} of {list} {direction}")]
    IllegalMove {
        list: ListAddress,
        index: usize,
        direction: MoveDirection,
    },

    #[error("Template does not fit {list}")]
    TemplateMismatch { list: ListAddress },

    #[error("List {list} does not exist")]
    NoSuchList { list: ListAddress },

    #[error("Figure has no panels")]
    EmptyFigure,

    // Archive Errors
    #[error("Archive {operation} failed at {url}: {source}")]
    ArchiveIo {
        operation: ArchiveOperation,
        url: String,
        #[source]
        source: ArchiveIoCause,
    },

    #[error("Invalid archive: {reason}")]
    InvalidArchive { reason: String },

    #[error("Cannot {event} while document is {from}")]
    InvalidSyncTransition { from: String, event: String },

    // Configuration Errors
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // File Errors
    #[error("Failed to read file: {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ManuscriptError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            ManuscriptError::OutOfRange { .. } => "OUT_OF_RANGE",
            ManuscriptError::IllegalMove { .. } => "ILLEGAL_MOVE",
            ManuscriptError::TemplateMismatch { .. } => "TEMPLATE_MISMATCH",
            ManuscriptError::NoSuchList { .. } => "NO_SUCH_LIST",
            ManuscriptError::EmptyFigure => "EMPTY_FIGURE",
            ManuscriptError::ArchiveIo { .. } => "ARCHIVE_IO",
            ManuscriptError::InvalidArchive { .. } => "INVALID_ARCHIVE",
            ManuscriptError::InvalidSyncTransition { .. } => "INVALID_SYNC_TRANSITION",
            ManuscriptError::InvalidConfig { .. } => "INVALID_CONFIG",
            ManuscriptError::FileReadError { .. } => "FILE_READ_ERROR",
            ManuscriptError::Serialization(_) => "SERIALIZATION_ERROR",
            ManuscriptError::Io(_) => "IO_ERROR",
        }
    }

    /// Returns true if the caller may retry the failed operation as-is.
    pub fn is_retryable(&self) -> bool {
        match self {
            ManuscriptError::ArchiveIo { source, .. } => match source {
                ArchiveIoCause::Transport(_) => true,
                ArchiveIoCause::Status { status, .. } => *status >= 500,
                ArchiveIoCause::MalformedJson(_) => false,
            },
            _ => false,
        }
    }

    /// Returns a user-facing recovery suggestion.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            ManuscriptError::ArchiveIo { .. } if self.is_retryable() => {
                Some("The archive server could not be reached. Try saving again.")
            }
            ManuscriptError::ArchiveIo { .. } => {
                Some("Check the archive endpoint and credentials.")
            }
            ManuscriptError::EmptyFigure => Some("Add a panel to the figure first."),
            ManuscriptError::InvalidConfig { .. } => {
                Some("Check MANUSCRIPT_ARCHIVE_URL and related settings.")
            }
            ManuscriptError::InvalidSyncTransition { .. } => {
                Some("Wait for the pending save to finish.")
            }
            _ => None,
        }
    }
}
