//! Attachment records embedded in entries.
//!
//! # Responsibility
//! - Define text/binary attachment shapes and their kind tags.
//! - Decode unknown kind tags into explicit fallback variants instead of
//!   failing, so older cores can still carry newer files verbatim.
//!
//! # Invariants
//! - An attachment belongs to exactly one entry; there is no sharing.
//! - Binary contents are stored as the exact imported byte sequence.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// How an attachment payload is held in memory and in the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    /// UTF-8 string payload.
    Text,
    /// Raw byte payload, never re-encoded.
    Binary,
}

/// Kind tag for text attachments.
///
/// The language/format tags only drive syntax-highlighting hints downstream;
/// they never change how the payload is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextAttachmentKind {
    PlainText,
    SourceCode { language: String },
    MarkupDocument,
    StructuredData { format: String },
    /// Classifier result for unrecognized extensions, and the decode
    /// fallback for kind tags this core does not know.
    #[serde(other)]
    Unspecified,
}

/// Kind tag for binary attachments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BinaryAttachmentKind {
    RasterPng,
    RasterJpeg,
    DocumentPdf,
    /// Decode fallback for kind tags this core does not know. The
    /// classifier never produces this variant.
    #[serde(other)]
    Unknown,
}

/// Text attachment with UTF-8 contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TextAttachment {
    pub kind: TextAttachmentKind,
    pub file_name: String,
    pub contents: String,
}

/// Binary attachment with raw byte contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BinaryAttachment {
    pub kind: BinaryAttachmentKind,
    pub file_name: String,
    pub contents: Vec<u8>,
}

/// Classifier output routing an attachment to its storage sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentKind {
    Text(TextAttachmentKind),
    Binary(BinaryAttachmentKind),
}

impl AttachmentKind {
    /// Storage mode implied by this kind.
    pub fn storage_mode(&self) -> StorageMode {
        match self {
            Self::Text(_) => StorageMode::Text,
            Self::Binary(_) => StorageMode::Binary,
        }
    }
}

/// One attachment of either storage mode, ready to join an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachment {
    Text(TextAttachment),
    Binary(BinaryAttachment),
}

/// Payload error raised while building an attachment from raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentPayloadError {
    /// A text-classified file did not contain valid UTF-8.
    NotUtf8 { file_name: String },
}

impl Display for AttachmentPayloadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotUtf8 { file_name } => {
                write!(f, "text attachment `{file_name}` is not valid UTF-8")
            }
        }
    }
}

impl Error for AttachmentPayloadError {}

impl Attachment {
    /// Builds an attachment from classified kind plus raw file bytes.
    ///
    /// Binary kinds keep the bytes untouched. Text kinds require the bytes
    /// to decode as UTF-8.
    pub fn from_bytes(
        kind: AttachmentKind,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, AttachmentPayloadError> {
        let file_name = file_name.into();
        match kind {
            AttachmentKind::Binary(kind) => Ok(Self::Binary(BinaryAttachment {
                kind,
                file_name,
                contents: bytes,
            })),
            AttachmentKind::Text(kind) => {
                let contents = String::from_utf8(bytes)
                    .map_err(|_| AttachmentPayloadError::NotUtf8 {
                        file_name: file_name.clone(),
                    })?;
                Ok(Self::Text(TextAttachment {
                    kind,
                    file_name,
                    contents,
                }))
            }
        }
    }

    /// File name as imported.
    pub fn file_name(&self) -> &str {
        match self {
            Self::Text(attachment) => &attachment.file_name,
            Self::Binary(attachment) => &attachment.file_name,
        }
    }

    /// Storage mode of this attachment.
    pub fn storage_mode(&self) -> StorageMode {
        match self {
            Self::Text(_) => StorageMode::Text,
            Self::Binary(_) => StorageMode::Binary,
        }
    }
}
