//! Attachment classification rules.
//!
//! # Responsibility
//! - Map a file path to an attachment kind and storage mode from its
//!   extension alone.
//!
//! # Invariants
//! - Pure and total: every path classifies, unknown extensions degrade to
//!   unspecified text instead of erroring.
//! - Matching is case-insensitive on the extension suffix.

use crate::model::attachment::{
    AttachmentKind, BinaryAttachmentKind, StorageMode, TextAttachmentKind,
};
use std::ffi::OsStr;
use std::path::Path;

/// Classifies a file path into an attachment kind and storage mode.
pub fn classify(path: &Path) -> (AttachmentKind, StorageMode) {
    let extension = path
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let kind = kind_for_extension(&extension);
    let mode = kind.storage_mode();
    (kind, mode)
}

fn kind_for_extension(extension: &str) -> AttachmentKind {
    match extension {
        "png" => AttachmentKind::Binary(BinaryAttachmentKind::RasterPng),
        "jpg" | "jpeg" => AttachmentKind::Binary(BinaryAttachmentKind::RasterJpeg),
        "pdf" => AttachmentKind::Binary(BinaryAttachmentKind::DocumentPdf),
        "txt" => AttachmentKind::Text(TextAttachmentKind::PlainText),
        "rs" => source_code("rust"),
        "c" => source_code("c"),
        "cpp" | "cxx" => source_code("cpp"),
        "ml" | "mli" => source_code("ocaml"),
        "saty" | "satyh" | "satyg" => source_code("satysfi"),
        "tex" | "aux" | "md" | "markdown" => {
            AttachmentKind::Text(TextAttachmentKind::MarkupDocument)
        }
        "json" => structured_data("json"),
        "toml" => structured_data("toml"),
        "yaml" | "yml" => structured_data("yaml"),
        _ => AttachmentKind::Text(TextAttachmentKind::Unspecified),
    }
}

fn source_code(language: &str) -> AttachmentKind {
    AttachmentKind::Text(TextAttachmentKind::SourceCode {
        language: language.to_string(),
    })
}

fn structured_data(format: &str) -> AttachmentKind {
    AttachmentKind::Text(TextAttachmentKind::StructuredData {
        format: format.to_string(),
    })
}
