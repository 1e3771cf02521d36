//! Document archives and their synchronization
//!
//! This module provides:
//! - `ArchiveResource` and `Archive`, the persisted document unit
//! - `TransmissionParts`, the blob/JSON split used on write
//! - `ArchiveStore` with HTTP and in-memory implementations
//! - `load_dir` for archive folders on disk

mod client;
mod document;
mod local;
mod memory;
mod parts;
mod resource;

pub use client::{ArchiveStore, HttpStorageClient, WriteAck};
pub use document::Archive;
pub use local::{load_dir, BODY_FILE};
pub use memory::MemoryArchiveStore;
pub use parts::{BlobPart, TransmissionParts, ARCHIVE_PART};
pub use resource::{ArchiveResource, Encoding, ResourcePayload};
