//! [`FileSystemAccess`] over the local disk.
//!
//! Entries are stat'ed without following symbolic links, the native
//! identifier is the inode number and content is sampled through a read-only
//! memory map.

use std::{
    ffi::OsString,
    io,
    os::unix::prelude::MetadataExt,
    path::{Path, PathBuf},
};

use file::{FileStats, FileSystemAccess, FsId};
use memmap2::Mmap;
use thiserror::Error;
use tracing::trace;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to resolve sync root {path:?}, {source}")]
    InvalidRoot { path: PathBuf, source: io::Error },
    #[error("Sync root {0:?} is not a directory")]
    RootNotDirectory(PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone)]
pub struct LocalFileSystemConfiguration {
    pub root: PathBuf,
}

pub struct LocalFileSystem {
    configuration: LocalFileSystemConfiguration,
}

impl LocalFileSystem {
    pub fn new(configuration: LocalFileSystemConfiguration) -> Result<Self> {
        let root = dunce::canonicalize(&configuration.root).map_err(|source| Error::InvalidRoot {
            path: configuration.root.clone(),
            source,
        })?;
        let metadata = std::fs::metadata(&root).map_err(|source| Error::InvalidRoot {
            path: root.clone(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(Error::RootNotDirectory(root));
        }

        Ok(Self {
            configuration: LocalFileSystemConfiguration { root },
        })
    }

    /// Canonical path of the sync root.
    pub fn root(&self) -> &Path {
        &self.configuration.root
    }
}

fn file_stats(metadata: &std::fs::Metadata) -> FileStats {
    FileStats {
        file_type: metadata.file_type().into(),
        size: metadata.len(),
        mtime: metadata.mtime(),
        fsid: Some(metadata.ino()).filter(|ino| *ino != 0).map(FsId),
    }
}

fn out_of_range(path: &Path, offset: u64, len: usize) -> io::Error {
    io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("{len} bytes at {offset} are past the end of {}", path.display()),
    )
}

impl FileSystemAccess for LocalFileSystem {
    fn stat(&self, path: &Path) -> io::Result<FileStats> {
        trace!(?path, "stat");
        std::fs::symlink_metadata(path).map(|metadata| file_stats(&metadata))
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<OsString>> {
        trace!(?path, "read_dir");
        std::fs::read_dir(path)?
            .map(|entry| entry.map(|entry| entry.file_name()))
            .collect()
    }

    fn read_at(&self, path: &Path, offset: u64, len: usize) -> io::Result<Vec<u8>> {
        let file = std::fs::File::open(path)?;
        let size = file.metadata()?.len();
        let start = usize::try_from(offset).map_err(|_| out_of_range(path, offset, len))?;
        let end = start
            .checked_add(len)
            .ok_or_else(|| out_of_range(path, offset, len))?;
        if end as u64 > size {
            return Err(out_of_range(path, offset, len));
        }
        if len == 0 {
            return Ok(vec![]);
        }

        let map = unsafe { Mmap::map(&file)? };
        map.get(start..end)
            .map(|bytes| bytes.to_vec())
            .ok_or_else(|| out_of_range(path, offset, len))
    }
}
