//! Knowledge entry domain model.
//!
//! # Responsibility
//! - Define the canonical entry record plus its pure transform operations.
//! - Keep identity stable across edits, reorders and reloads.
//!
//! # Invariants
//! - `id` is assigned once at creation and never reused.
//! - Transforms return new values; an existing entry value is never
//!   mutated through a shared reference.
//! - `commit_edit` is the only operation that stamps `last_edited`.

use crate::model::attachment::{Attachment, BinaryAttachment, TextAttachment};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one knowledge entry.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type EntryId = Uuid;

/// One user-authored knowledge record with memo, metadata and attachments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Entry {
    /// Stable ID used for addressing this entry while it lives in a
    /// collection. Positional indexes are never used as identity.
    pub id: EntryId,
    pub title: String,
    #[serde(default)]
    pub book_name: String,
    #[serde(default)]
    pub book_author: String,
    #[serde(default)]
    pub url: String,
    /// Raw markup source text; the derived tree is never persisted.
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub keywords: BTreeSet<String>,
    /// Newest-first insertion order, preserved across save/load.
    #[serde(default)]
    pub text_attachments: Vec<TextAttachment>,
    #[serde(default)]
    pub binary_attachments: Vec<BinaryAttachment>,
    pub created_at: DateTime<Utc>,
    pub last_edited: DateTime<Utc>,
}

/// Field patch applied by [`Entry::apply`]. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct EntryPatch {
    pub title: Option<String>,
    pub book_name: Option<String>,
    pub book_author: Option<String>,
    pub url: Option<String>,
    pub memo: Option<String>,
    pub keywords: Option<BTreeSet<String>>,
}

/// Selector for one of the two attachment sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentSlot {
    Text,
    Binary,
}

impl Display for AttachmentSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Binary => write!(f, "binary"),
        }
    }
}

/// Validation failure for entries entering a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryValidationError {
    /// The title must be non-empty before the entry may be committed.
    EmptyTitle,
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "entry title must not be empty"),
        }
    }
}

impl Error for EntryValidationError {}

/// Failure removing an attachment by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetachError {
    IndexOutOfRange {
        slot: AttachmentSlot,
        index: usize,
        len: usize,
    },
}

impl Display for DetachError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange { slot, index, len } => write!(
                f,
                "no {slot} attachment at index {index} (sequence length {len})"
            ),
        }
    }
}

impl Error for DetachError {}

impl Entry {
    /// Creates an entry with empty defaults and now-timestamps.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: String::new(),
            book_name: String::new(),
            book_author: String::new(),
            url: String::new(),
            memo: String::new(),
            keywords: BTreeSet::new(),
            text_attachments: Vec::new(),
            binary_attachments: Vec::new(),
            created_at: now,
            last_edited: now,
        }
    }

    /// Checks the commit-boundary invariant.
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.title.is_empty() {
            return Err(EntryValidationError::EmptyTitle);
        }
        Ok(())
    }

    /// Returns a copy with the patched fields replaced.
    ///
    /// Pure transform: `self` is left untouched and timestamps are not
    /// stamped here (see [`Entry::commit_edit`]).
    pub fn apply(&self, patch: EntryPatch) -> Self {
        let mut next = self.clone();
        if let Some(title) = patch.title {
            next.title = title;
        }
        if let Some(book_name) = patch.book_name {
            next.book_name = book_name;
        }
        if let Some(book_author) = patch.book_author {
            next.book_author = book_author;
        }
        if let Some(url) = patch.url {
            next.url = url;
        }
        if let Some(memo) = patch.memo {
            next.memo = memo;
        }
        if let Some(keywords) = patch.keywords {
            next.keywords = keywords;
        }
        next
    }

    /// Returns a copy with the attachment prepended to the sequence
    /// matching its storage mode. Does not stamp `last_edited`.
    pub fn attach(&self, attachment: Attachment) -> Self {
        let mut next = self.clone();
        match attachment {
            Attachment::Text(attachment) => next.text_attachments.insert(0, attachment),
            Attachment::Binary(attachment) => next.binary_attachments.insert(0, attachment),
        }
        next
    }

    /// Returns a copy with the attachment at `index` removed.
    ///
    /// Fails without producing a new value when the index does not exist,
    /// so the caller's entry is untouched on error.
    pub fn detach(&self, slot: AttachmentSlot, index: usize) -> Result<Self, DetachError> {
        let len = self.attachment_count(slot);
        if index >= len {
            return Err(DetachError::IndexOutOfRange { slot, index, len });
        }
        let mut next = self.clone();
        match slot {
            AttachmentSlot::Text => {
                next.text_attachments.remove(index);
            }
            AttachmentSlot::Binary => {
                next.binary_attachments.remove(index);
            }
        }
        Ok(next)
    }

    /// Length of one attachment sequence.
    pub fn attachment_count(&self, slot: AttachmentSlot) -> usize {
        match slot {
            AttachmentSlot::Text => self.text_attachments.len(),
            AttachmentSlot::Binary => self.binary_attachments.len(),
        }
    }

    /// Returns a copy with `last_edited` stamped to the current time.
    pub fn commit_edit(&self) -> Self {
        let mut next = self.clone();
        next.last_edited = Utc::now();
        next
    }
}

impl Default for Entry {
    fn default() -> Self {
        Self::new()
    }
}
