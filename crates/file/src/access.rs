use std::{ffi::OsString, io, path::Path};

use crate::{FileStats, NodeHandle};

/// Blocking access to a filesystem, one call per operation.
pub trait FileSystemAccess {
    /// Opens `path` without following symbolic links and reports its type,
    /// size, modification time and native identifier.
    fn stat(&self, path: &Path) -> io::Result<FileStats>;

    /// Lists the names of the children of the directory at `path`, in the
    /// order the filesystem reports them.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<OsString>>;

    /// Reads exactly `len` bytes starting at `offset`.
    fn read_at(&self, path: &Path, offset: u64, len: usize) -> io::Result<Vec<u8>>;
}

impl<T: FileSystemAccess + ?Sized> FileSystemAccess for &T {
    fn stat(&self, path: &Path) -> io::Result<FileStats> {
        (**self).stat(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<OsString>> {
        (**self).read_dir(path)
    }

    fn read_at(&self, path: &Path, offset: u64, len: usize) -> io::Result<Vec<u8>> {
        (**self).read_at(path, offset, len)
    }
}

/// Application supplied filter. A path rejected here is treated as if it did
/// not exist.
pub trait Syncable {
    fn is_syncable(&self, path: &Path, remote: Option<NodeHandle>) -> bool;
}

impl<F> Syncable for F
where
    F: Fn(&Path, Option<NodeHandle>) -> bool,
{
    fn is_syncable(&self, path: &Path, remote: Option<NodeHandle>) -> bool {
        self(path, remote)
    }
}

/// Accepts every path.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllSyncable;

impl Syncable for AllSyncable {
    fn is_syncable(&self, _path: &Path, _remote: Option<NodeHandle>) -> bool {
        true
    }
}
