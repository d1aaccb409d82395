//! Historical `0.0.0` container shape and its upgrade path.
//!
//! # Responsibility
//! - Parse project files written before per-entry identity and the
//!   `book_author` field existed.
//! - Upgrade them losslessly into the current collection shape at load
//!   time; the next save rewrites the file as the current version.
//!
//! # Invariants
//! - The collection identity is carried over unchanged.
//! - Every legacy attachment maps onto a current kind; nothing is dropped.

use crate::container::{Collection, CollectionId, CONTAINER_VERSION};
use crate::model::attachment::{
    BinaryAttachment, BinaryAttachmentKind, TextAttachment, TextAttachmentKind,
};
use crate::model::entry::Entry;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

/// Version string written by `0.0.0` producers.
pub const LEGACY_VERSION: &str = "0.0.0";

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegacyTextKind {
    Text,
    Rust,
    Tex,
    Json,
    Toml,
    Yaml,
    C,
    Cpp,
    Ocaml,
    Satysfi,
    AnyTextFile,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LegacyTextFile {
    pub file_type: LegacyTextKind,
    pub file_name: String,
    pub contents: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegacyBinaryKind {
    Png,
    Jpeg,
    Pdf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LegacyBinaryFile {
    pub file_type: LegacyBinaryKind,
    pub file_name: String,
    pub contents: Vec<u8>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LegacyEntry {
    pub title: String,
    pub book_name: String,
    pub url: String,
    pub keywords: Vec<String>,
    pub text_files: Vec<LegacyTextFile>,
    pub binary_files: Vec<LegacyBinaryFile>,
    pub memo: String,
    pub created_at: DateTime<Utc>,
    pub last_edit: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LegacyCollection {
    pub id: CollectionId,
    #[serde(rename = "quire_version")]
    pub version: String,
    pub data: Vec<LegacyEntry>,
}

/// Upgrades a legacy collection to the current in-memory shape.
///
/// Legacy entries had no stable identity of their own, so each one is
/// assigned a fresh ID here; `book_author` did not exist yet and starts
/// empty.
pub fn upgrade(legacy: LegacyCollection) -> Collection {
    Collection {
        id: legacy.id,
        schema_version: CONTAINER_VERSION.to_string(),
        entries: legacy.data.into_iter().map(upgrade_entry).collect(),
    }
}

fn upgrade_entry(legacy: LegacyEntry) -> Entry {
    Entry {
        id: Uuid::new_v4(),
        title: legacy.title,
        book_name: legacy.book_name,
        book_author: String::new(),
        url: legacy.url,
        memo: legacy.memo,
        keywords: legacy.keywords.into_iter().collect(),
        text_attachments: legacy.text_files.into_iter().map(upgrade_text).collect(),
        binary_attachments: legacy
            .binary_files
            .into_iter()
            .map(upgrade_binary)
            .collect(),
        created_at: legacy.created_at,
        last_edited: legacy.last_edit,
    }
}

fn upgrade_text(legacy: LegacyTextFile) -> TextAttachment {
    TextAttachment {
        kind: upgrade_text_kind(legacy.file_type),
        file_name: legacy.file_name,
        contents: legacy.contents,
    }
}

fn upgrade_text_kind(kind: LegacyTextKind) -> TextAttachmentKind {
    match kind {
        LegacyTextKind::Text => TextAttachmentKind::PlainText,
        LegacyTextKind::Rust => source_code("rust"),
        LegacyTextKind::C => source_code("c"),
        LegacyTextKind::Cpp => source_code("cpp"),
        LegacyTextKind::Ocaml => source_code("ocaml"),
        LegacyTextKind::Satysfi => source_code("satysfi"),
        LegacyTextKind::Tex => TextAttachmentKind::MarkupDocument,
        LegacyTextKind::Json => structured_data("json"),
        LegacyTextKind::Toml => structured_data("toml"),
        LegacyTextKind::Yaml => structured_data("yaml"),
        LegacyTextKind::AnyTextFile => TextAttachmentKind::Unspecified,
    }
}

fn upgrade_binary(legacy: LegacyBinaryFile) -> BinaryAttachment {
    BinaryAttachment {
        kind: match legacy.file_type {
            LegacyBinaryKind::Png => BinaryAttachmentKind::RasterPng,
            LegacyBinaryKind::Jpeg => BinaryAttachmentKind::RasterJpeg,
            LegacyBinaryKind::Pdf => BinaryAttachmentKind::DocumentPdf,
        },
        file_name: legacy.file_name,
        contents: legacy.contents,
    }
}

fn source_code(language: &str) -> TextAttachmentKind {
    TextAttachmentKind::SourceCode {
        language: language.to_string(),
    }
}

fn structured_data(format: &str) -> TextAttachmentKind {
    TextAttachmentKind::StructuredData {
        format: format.to_string(),
    }
}
