//! Manuscript - figure content model and archive synchronization
//!
//! Manuscript provides the two pieces of a structured manuscript editor
//! that carry real state:
//! 1. A figure model - panels of ordered metadata fields, edited through
//!    position-based commands that keep the selection and tool state valid
//! 2. Archive sync - persisting a document (body plus JSON and binary
//!    resources) to a remote store, sending blobs as separate parts
//!
//! # Architecture
//!
//! - `figure`: `MetadataField`, `Panel`, `FigureModel`
//! - `editing`: `FieldEditCommands`, selection, tool enablement
//! - `archive`: `Archive`, resources, `ArchiveStore` implementations
//! - `session`: a document bound to a store, with its sync state

pub mod archive;
pub mod cli;
pub mod config;
pub mod editing;
pub mod error;
pub mod figure;
pub mod session;

pub use error::{ManuscriptError, Result};
