use std::{io, path::PathBuf};

use file::FileType;
use thiserror::Error;

/// Problem met while enumerating the filesystem. None of these stop the pass
/// on their own; they are collected and make the pass unsuccessful.
#[derive(Error, Debug)]
pub enum WalkError {
    #[error("Failed to open sync root {path:?}, {source}")]
    RootUnavailable { path: PathBuf, source: io::Error },
    #[error("Sync root {path:?} is not a directory")]
    RootNotDirectory { path: PathBuf },
    #[error("Failed to open {path:?}, {source}")]
    OpenFailed { path: PathBuf, source: io::Error },
    #[error("Failed to list directory {path:?}, {source}")]
    ListFailed { path: PathBuf, source: io::Error },
    #[error("Failed to read content of {path:?}, {source}")]
    ReadFailed { path: PathBuf, source: io::Error },
    #[error("{path:?} has no filesystem identifier")]
    MissingIdentifier { path: PathBuf },
    #[error("Unexpected entry type {file_type} at {path:?}")]
    UnexpectedType { path: PathBuf, file_type: FileType },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkErrorKind {
    /// The tree could not be enumerated as a whole; the walk stopped.
    Structural,
    /// A single entry was unavailable; its siblings were still enumerated.
    Io,
}

impl WalkError {
    pub fn kind(&self) -> WalkErrorKind {
        match self {
            WalkError::RootUnavailable { .. }
            | WalkError::RootNotDirectory { .. }
            | WalkError::UnexpectedType { .. } => WalkErrorKind::Structural,
            WalkError::OpenFailed { .. }
            | WalkError::ListFailed { .. }
            | WalkError::ReadFailed { .. }
            | WalkError::MissingIdentifier { .. } => WalkErrorKind::Io,
        }
    }

    pub fn path(&self) -> &std::path::Path {
        match self {
            WalkError::RootUnavailable { path, .. }
            | WalkError::RootNotDirectory { path }
            | WalkError::OpenFailed { path, .. }
            | WalkError::ListFailed { path, .. }
            | WalkError::ReadFailed { path, .. }
            | WalkError::MissingIdentifier { path }
            | WalkError::UnexpectedType { path, .. } => path,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Tracker(#[from] tracker::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
