//! Container file I/O.
//!
//! # Responsibility
//! - Read and write container bytes at a bound path.
//! - Carry the attempted path on every I/O failure so the boundary can
//!   report it verbatim.

use crate::container::{self, Collection, ContainerError};
use log::{error, info};
use std::fs;
use std::path::{Path, PathBuf};

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage failure while moving container bytes to or from disk.
#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Container(ContainerError),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "i/o failure at `{}`: {source}", path.display()),
            Self::Container(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Container(err) => Some(err),
        }
    }
}

impl From<ContainerError> for StoreError {
    fn from(value: ContainerError) -> Self {
        Self::Container(value)
    }
}

/// Reads and decodes the container at `path`.
///
/// Either fully succeeds or fails without exposing a partial collection.
pub fn read_container(path: &Path) -> StoreResult<Collection> {
    let bytes = fs::read(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let collection = container::decode(&bytes)?;
    info!(
        "event=container_read module=store status=ok path={} entries={}",
        path.display(),
        collection.len()
    );
    Ok(collection)
}

/// Encodes the collection and writes the bytes to `path`.
pub fn write_container(path: &Path, collection: &Collection) -> StoreResult<()> {
    let bytes = container::encode(collection)?;
    if let Err(source) = fs::write(path, &bytes) {
        error!(
            "event=container_write module=store status=error path={} error={source}",
            path.display()
        );
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }
    info!(
        "event=container_write module=store status=ok path={} bytes={}",
        path.display(),
        bytes.len()
    );
    Ok(())
}
