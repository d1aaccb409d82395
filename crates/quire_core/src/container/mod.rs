//! Project container codec and collection model.
//!
//! # Responsibility
//! - Define the collection record (durable identity + schema version +
//!   ordered entries) matching one project file.
//! - Encode/decode the collection to/from container bytes, including the
//!   historical shapes a current core must still read.
//!
//! # Invariants
//! - `decode(encode(c)) == c` for every valid collection, down to
//!   attachment bytes and ordering.
//! - `id` is generated once per project file and survives every
//!   load/edit/save cycle unchanged.
//! - Decoding never silently drops an attachment; unknown kind tags land
//!   on fallback kinds instead.

use crate::model::entry::{Entry, EntryId, EntryValidationError};
use bson::Bson;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod legacy_0_0_0;

/// Container format version written by this core.
pub const CONTAINER_VERSION: &str = "0.1.0";

/// Durable identity of one project file, independent of its path on disk.
pub type CollectionId = Uuid;

/// The full set of entries plus identity and schema version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Collection {
    pub id: CollectionId,
    /// Producer version string; doubles as the container format marker.
    /// Informational for this core: a differing-but-parseable value is
    /// accepted and preserved as-is.
    #[serde(rename = "quire_version")]
    pub schema_version: String,
    pub entries: Vec<Entry>,
}

/// Codec failure taxonomy for container bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerError {
    /// Format marker absent, byte stream truncated, or a known-version
    /// record that does not parse.
    Malformed(String),
    /// A version this core cannot structurally parse at all.
    UnsupportedVersion { version: String },
    /// Serialization failure while producing container bytes.
    Encode(String),
}

impl Display for ContainerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(details) => write!(f, "malformed container: {details}"),
            Self::UnsupportedVersion { version } => {
                write!(f, "unsupported container version: {version}")
            }
            Self::Encode(details) => write!(f, "container encode failed: {details}"),
        }
    }
}

impl Error for ContainerError {}

/// Mutation failure against a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    Validation(EntryValidationError),
    EntryNotFound(EntryId),
}

impl Display for CollectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::EntryNotFound(id) => write!(f, "entry not found: {id}"),
        }
    }
}

impl Error for CollectionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::EntryNotFound(_) => None,
        }
    }
}

impl From<EntryValidationError> for CollectionError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl Collection {
    /// Creates an empty collection with a freshly generated identity.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            schema_version: CONTAINER_VERSION.to_string(),
            entries: Vec::new(),
        }
    }

    /// Commits an entry into the collection, newest first.
    ///
    /// This is the boundary where the non-empty-title invariant is
    /// enforced; on rejection the collection is unchanged.
    pub fn insert(&mut self, entry: Entry) -> Result<EntryId, CollectionError> {
        entry.validate()?;
        let id = entry.id;
        self.entries.insert(0, entry);
        Ok(id)
    }

    /// Replaces the stored entry carrying the same ID, keeping its position.
    ///
    /// Re-runs boundary validation so an edit cannot smuggle an empty
    /// title into the collection.
    pub fn replace(&mut self, entry: Entry) -> Result<(), CollectionError> {
        entry.validate()?;
        let position = self
            .position(entry.id)
            .ok_or(CollectionError::EntryNotFound(entry.id))?;
        self.entries[position] = entry;
        Ok(())
    }

    /// Removes and returns one entry by ID.
    pub fn remove(&mut self, id: EntryId) -> Result<Entry, CollectionError> {
        let position = self.position(id).ok_or(CollectionError::EntryNotFound(id))?;
        Ok(self.entries.remove(position))
    }

    /// Returns one entry by ID.
    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.position(id).map(|position| &self.entries[position])
    }

    /// Ordered view of the entries, newest first.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }
}

impl Default for Collection {
    fn default() -> Self {
        Self::new()
    }
}

/// Encodes a collection into container bytes.
pub fn encode(collection: &Collection) -> Result<Vec<u8>, ContainerError> {
    bson::to_vec(collection).map_err(|err| ContainerError::Encode(err.to_string()))
}

/// Decodes container bytes, upgrading known historical shapes.
pub fn decode(bytes: &[u8]) -> Result<Collection, ContainerError> {
    let raw = bson::from_slice::<Bson>(bytes)
        .map_err(|err| ContainerError::Malformed(format!("unreadable byte stream: {err}")))?;
    let version = raw
        .as_document()
        .and_then(|document| document.get("quire_version"))
        .and_then(Bson::as_str)
        .ok_or_else(|| {
            ContainerError::Malformed("missing `quire_version` format marker".to_string())
        })?
        .to_string();

    match version.as_str() {
        CONTAINER_VERSION => bson::from_bson::<Collection>(raw).map_err(|err| {
            ContainerError::Malformed(format!("broken {CONTAINER_VERSION} record: {err}"))
        }),
        legacy_0_0_0::LEGACY_VERSION => {
            let legacy = bson::from_bson::<legacy_0_0_0::LegacyCollection>(raw).map_err(|err| {
                ContainerError::Malformed(format!(
                    "broken {} record: {err}",
                    legacy_0_0_0::LEGACY_VERSION
                ))
            })?;
            Ok(legacy_0_0_0::upgrade(legacy))
        }
        // A later producer may still write a shape this core reads; only a
        // structurally incompatible document is rejected.
        _ => bson::from_bson::<Collection>(raw)
            .map_err(|_| ContainerError::UnsupportedVersion { version }),
    }
}
