//! Persistence synchronizer state machine.
//!
//! # Responsibility
//! - Track whether the bound project file matches the in-memory
//!   collection, and gate writes so at most one is in flight.
//! - Coalesce mutations arriving mid-write into exactly one follow-up
//!   write of the latest state.
//!
//! # Invariants
//! - `begin_write` is only legal in `BoundDirty`; `complete_write` is only
//!   legal in `Writing`.
//! - A failed write always lands back in `BoundDirty` so the boundary can
//!   retry; the error itself is surfaced by the caller driving the write.
//! - The bound path changes only through `bind` or an explicit `rebind`
//!   ("save as"), never as a side effect of writing.

use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Synchronization state of one open project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// No file path bound yet.
    Unbound,
    /// On-disk bytes match the in-memory collection.
    BoundClean,
    /// A mutation happened since the last successful write.
    BoundDirty,
    /// A write is in flight.
    Writing,
}

impl Display for SyncState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unbound => write!(f, "unbound"),
            Self::BoundClean => write!(f, "bound-clean"),
            Self::BoundDirty => write!(f, "bound-dirty"),
            Self::Writing => write!(f, "writing"),
        }
    }
}

/// State-machine misuse by the driving boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    AlreadyBound { path: PathBuf },
    NotBound,
    NotDirty,
    WriteInFlight,
    NoWriteInFlight { state: SyncState },
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyBound { path } => {
                write!(f, "already bound to `{}`", path.display())
            }
            Self::NotBound => write!(f, "no project file bound"),
            Self::NotDirty => write!(f, "nothing to write: collection is clean"),
            Self::WriteInFlight => write!(f, "a write is already in flight"),
            Self::NoWriteInFlight { state } => {
                write!(f, "no write in flight (state: {state})")
            }
        }
    }
}

impl Error for SyncError {}

/// Single-writer synchronizer for one bound project file.
#[derive(Debug)]
pub struct Synchronizer {
    state: SyncState,
    bound_path: Option<PathBuf>,
    /// Set when a mutation arrives mid-write; forces one follow-up write.
    pending_mutation: bool,
}

impl Synchronizer {
    pub fn new() -> Self {
        Self {
            state: SyncState::Unbound,
            bound_path: None,
            pending_mutation: false,
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn bound_path(&self) -> Option<&Path> {
        self.bound_path.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.state == SyncState::BoundDirty
    }

    /// Binds a path, covering both "create new" and "just loaded".
    ///
    /// The collection counts as dirty until its first confirmed write.
    pub fn bind(&mut self, path: impl Into<PathBuf>) -> Result<(), SyncError> {
        if let Some(bound) = &self.bound_path {
            return Err(SyncError::AlreadyBound {
                path: bound.clone(),
            });
        }
        let path = path.into();
        info!(
            "event=project_bind module=sync status=ok path={}",
            path.display()
        );
        self.bound_path = Some(path);
        self.state = SyncState::BoundDirty;
        Ok(())
    }

    /// Rebinds to a new path ("save as"), marking the collection dirty so
    /// the next write lands at the new location.
    pub fn rebind(&mut self, path: impl Into<PathBuf>) -> Result<(), SyncError> {
        match self.state {
            SyncState::Unbound => Err(SyncError::NotBound),
            SyncState::Writing => Err(SyncError::WriteInFlight),
            SyncState::BoundClean | SyncState::BoundDirty => {
                let path = path.into();
                info!(
                    "event=project_rebind module=sync status=ok path={}",
                    path.display()
                );
                self.bound_path = Some(path);
                self.state = SyncState::BoundDirty;
                Ok(())
            }
        }
    }

    /// Records one in-memory mutation.
    ///
    /// Mid-write mutations are coalesced: any number of calls while
    /// `Writing` schedules exactly one follow-up write. Before a bind this
    /// is a no-op; there is nothing to keep in sync yet.
    pub fn note_mutation(&mut self) {
        match self.state {
            SyncState::Unbound => {}
            SyncState::BoundClean => self.state = SyncState::BoundDirty,
            SyncState::BoundDirty => {}
            SyncState::Writing => self.pending_mutation = true,
        }
    }

    /// Claims the write slot, returning the path to write to.
    pub fn begin_write(&mut self) -> Result<&Path, SyncError> {
        match self.state {
            SyncState::Unbound => return Err(SyncError::NotBound),
            SyncState::BoundClean => return Err(SyncError::NotDirty),
            SyncState::Writing => return Err(SyncError::WriteInFlight),
            SyncState::BoundDirty => {}
        }
        match self.bound_path.as_deref() {
            Some(path) => {
                self.state = SyncState::Writing;
                Ok(path)
            }
            None => Err(SyncError::NotBound),
        }
    }

    /// Releases the write slot, reporting whether the write succeeded.
    ///
    /// Returns the resulting state: `BoundClean`, or `BoundDirty` when the
    /// write failed or a newer mutation arrived while it ran.
    pub fn complete_write(&mut self, succeeded: bool) -> Result<SyncState, SyncError> {
        if self.state != SyncState::Writing {
            return Err(SyncError::NoWriteInFlight { state: self.state });
        }
        self.state = if succeeded && !self.pending_mutation {
            SyncState::BoundClean
        } else {
            if !succeeded {
                warn!("event=write_complete module=sync status=error outcome=retained_dirty");
            }
            SyncState::BoundDirty
        };
        self.pending_mutation = false;
        Ok(self.state)
    }
}

impl Default for Synchronizer {
    fn default() -> Self {
        Self::new()
    }
}
