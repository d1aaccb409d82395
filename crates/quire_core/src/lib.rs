//! Core document model and project-file persistence for Quire.
//! This crate is the single source of truth for container invariants.

pub mod classify;
pub mod container;
pub mod logging;
pub mod markup;
pub mod model;
pub mod service;
pub mod store;
pub mod sync;

pub use classify::classify;
pub use container::{
    decode, encode, Collection, CollectionError, CollectionId, ContainerError, CONTAINER_VERSION,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use markup::markdown::MarkdownParser;
pub use markup::{MarkupBlock, MarkupInline, MarkupListItem, MarkupParser};
pub use model::attachment::{
    Attachment, AttachmentKind, AttachmentPayloadError, BinaryAttachment, BinaryAttachmentKind,
    StorageMode, TextAttachment, TextAttachmentKind,
};
pub use model::entry::{
    AttachmentSlot, DetachError, Entry, EntryId, EntryPatch, EntryValidationError,
};
pub use service::session::{ProjectSession, SessionError};
pub use store::{StoreError, StoreResult};
pub use sync::{SyncError, SyncState, Synchronizer};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
