//! Domain model for knowledge entries and their attachments.
//!
//! # Responsibility
//! - Define the canonical entry record persisted inside a project container.
//! - Keep attachment payloads byte-exact from import to re-export.
//!
//! # Invariants
//! - Every entry carries a stable `EntryId` assigned at creation.
//! - Attachment sequences preserve insertion order (newest first).

pub mod attachment;
pub mod entry;
