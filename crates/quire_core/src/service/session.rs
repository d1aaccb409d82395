//! Project session: one open collection, its derived markup and its file.
//!
//! # Responsibility
//! - Own the in-memory collection plus the synchronizer for its file.
//! - Re-derive markup trees for changed memos before every write, and keep
//!   the on-disk container tracking every committed mutation.
//!
//! # Invariants
//! - Rejected mutations leave the collection, trees and sync state
//!   untouched.
//! - A failed write keeps the mutation in memory and the state
//!   `BoundDirty`; `flush` is the manual retry surface.
//! - Markup trees are derived state only; they never reach the container.

use crate::classify::classify;
use crate::container::{Collection, CollectionError};
use crate::markup::{MarkupBlock, MarkupParser};
use crate::model::attachment::{Attachment, AttachmentPayloadError};
use crate::model::entry::{AttachmentSlot, DetachError, Entry, EntryId, EntryPatch};
use crate::store::{self, StoreError};
use crate::sync::{SyncError, SyncState, Synchronizer};
use log::info;
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Session-level failure taxonomy.
#[derive(Debug)]
pub enum SessionError {
    Collection(CollectionError),
    Detach(DetachError),
    Payload(AttachmentPayloadError),
    Store(StoreError),
    Sync(SyncError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Collection(err) => write!(f, "{err}"),
            Self::Detach(err) => write!(f, "{err}"),
            Self::Payload(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Sync(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Collection(err) => Some(err),
            Self::Detach(err) => Some(err),
            Self::Payload(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Sync(err) => Some(err),
        }
    }
}

impl From<CollectionError> for SessionError {
    fn from(value: CollectionError) -> Self {
        Self::Collection(value)
    }
}

impl From<DetachError> for SessionError {
    fn from(value: DetachError) -> Self {
        Self::Detach(value)
    }
}

impl From<AttachmentPayloadError> for SessionError {
    fn from(value: AttachmentPayloadError) -> Self {
        Self::Payload(value)
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<SyncError> for SessionError {
    fn from(value: SyncError) -> Self {
        Self::Sync(value)
    }
}

/// One open project: collection, derived markup and write machinery.
pub struct ProjectSession<P: MarkupParser> {
    parser: P,
    collection: Collection,
    synchronizer: Synchronizer,
    trees: BTreeMap<EntryId, Vec<MarkupBlock>>,
    /// Entries whose memo changed since the last derivation.
    stale_memos: BTreeSet<EntryId>,
}

impl<P: MarkupParser> ProjectSession<P> {
    /// Starts an unbound session over a fresh, empty collection.
    pub fn new(parser: P) -> Self {
        Self {
            parser,
            collection: Collection::new(),
            synchronizer: Synchronizer::new(),
            trees: BTreeMap::new(),
            stale_memos: BTreeSet::new(),
        }
    }

    /// Loads the container at `path` and binds the session to it.
    ///
    /// Every memo is scheduled for derivation, then the loaded state is
    /// written back once so the session reaches `BoundClean`.
    pub fn open(parser: P, path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let collection = store::read_container(path)?;
        let mut session = Self::new(parser);
        session.stale_memos = collection.entries().iter().map(|entry| entry.id).collect();
        session.collection = collection;
        session.synchronizer.bind(path)?;
        session.flush()?;
        info!(
            "event=project_open module=session status=ok path={} entries={}",
            path.display(),
            session.collection.len()
        );
        Ok(session)
    }

    /// Binds a freshly created collection to its project file.
    pub fn bind(&mut self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        self.synchronizer.bind(path.as_ref())?;
        self.flush()
    }

    /// Rebinds to a new path ("save as") and writes there.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        self.synchronizer.rebind(path.as_ref())?;
        self.flush()
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn state(&self) -> SyncState {
        self.synchronizer.state()
    }

    /// Derived markup tree for one entry, if derived already.
    pub fn markup(&self, id: EntryId) -> Option<&[MarkupBlock]> {
        self.trees.get(&id).map(Vec::as_slice)
    }

    /// Commits an entry into the collection.
    ///
    /// Rejects entries with an empty title; on rejection nothing changes.
    pub fn commit_entry(&mut self, entry: Entry) -> Result<EntryId, SessionError> {
        let id = self.collection.insert(entry)?;
        self.stale_memos.insert(id);
        self.after_mutation()?;
        Ok(id)
    }

    /// Applies a field patch to one entry and stamps its edit time.
    pub fn update_entry(&mut self, id: EntryId, patch: EntryPatch) -> Result<(), SessionError> {
        let entry = self
            .collection
            .entry(id)
            .ok_or(CollectionError::EntryNotFound(id))?;
        let memo_changed = patch
            .memo
            .as_deref()
            .is_some_and(|memo| memo != entry.memo);
        let updated = entry.apply(patch).commit_edit();
        self.collection.replace(updated)?;
        if memo_changed {
            self.stale_memos.insert(id);
        }
        self.after_mutation()
    }

    /// Classifies and attaches a file's bytes to one entry.
    ///
    /// The classifier routes the payload to the text or binary sequence;
    /// text-classified bytes must decode as UTF-8.
    pub fn attach_file(
        &mut self,
        id: EntryId,
        file_path: &Path,
        bytes: Vec<u8>,
    ) -> Result<(), SessionError> {
        let entry = self
            .collection
            .entry(id)
            .ok_or(CollectionError::EntryNotFound(id))?;
        let (kind, _mode) = classify(file_path);
        let file_name = file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let attachment = Attachment::from_bytes(kind, file_name, bytes)?;
        let updated = entry.attach(attachment);
        self.collection.replace(updated)?;
        self.after_mutation()
    }

    /// Removes one attachment by position.
    pub fn detach(
        &mut self,
        id: EntryId,
        slot: AttachmentSlot,
        index: usize,
    ) -> Result<(), SessionError> {
        let entry = self
            .collection
            .entry(id)
            .ok_or(CollectionError::EntryNotFound(id))?;
        let updated = entry.detach(slot, index)?;
        self.collection.replace(updated)?;
        self.after_mutation()
    }

    /// Deletes one entry and its derived tree.
    pub fn remove_entry(&mut self, id: EntryId) -> Result<Entry, SessionError> {
        let removed = self.collection.remove(id)?;
        self.trees.remove(&id);
        self.stale_memos.remove(&id);
        self.after_mutation()?;
        Ok(removed)
    }

    /// Derives pending markup trees, then drives the write loop until the
    /// collection is clean.
    ///
    /// Derivation always completes before the write it belongs to begins.
    /// On a write failure the synchronizer stays `BoundDirty` and the
    /// error propagates; calling `flush` again retries.
    pub fn flush(&mut self) -> Result<(), SessionError> {
        if self.synchronizer.state() == SyncState::Unbound {
            return Err(SessionError::Sync(SyncError::NotBound));
        }
        while self.synchronizer.is_dirty() {
            self.derive_stale_trees();
            let path = self.synchronizer.begin_write()?.to_path_buf();
            match store::write_container(&path, &self.collection) {
                Ok(()) => {
                    self.synchronizer.complete_write(true)?;
                }
                Err(err) => {
                    self.synchronizer.complete_write(false)?;
                    return Err(err.into());
                }
            }
        }
        Ok(())
    }

    /// Marks the mutation and, while bound, keeps the file in sync.
    ///
    /// Unbound sessions accumulate mutations until `bind` writes them out.
    fn after_mutation(&mut self) -> Result<(), SessionError> {
        self.synchronizer.note_mutation();
        if self.synchronizer.state() == SyncState::Unbound {
            self.derive_stale_trees();
            return Ok(());
        }
        self.flush()
    }

    fn derive_stale_trees(&mut self) {
        for id in std::mem::take(&mut self.stale_memos) {
            if let Some(entry) = self.collection.entry(id) {
                self.trees.insert(id, self.parser.parse(&entry.memo));
            }
        }
    }
}
