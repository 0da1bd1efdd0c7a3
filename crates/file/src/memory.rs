//! In-memory filesystem.
//!
//! Entries are created explicitly, every one of them gets a fresh identifier
//! and (for files) a fresh modification time, so two files only share a
//! fingerprint when their content is copied with [`MemoryFileSystem::copy_content`].
//! Directories all start with mtime `0`, which makes their fingerprints
//! coincide the way they tend to on real filesystems.
//!
//! Failures can be injected per entry: an entry that is not openable fails
//! every call, an entry that is not readable fails content reads only.

use std::{
    collections::BTreeMap,
    ffi::OsString,
    io,
    path::{Path, PathBuf},
};

use parking_lot::Mutex;

use crate::{FileStats, FileSystemAccess, FileType, Fingerprint, FsId};

#[derive(Debug, Clone)]
struct MemoryEntry {
    file_type: FileType,
    content: Vec<u8>,
    mtime: i64,
    fsid: Option<FsId>,
    openable: bool,
    readable: bool,
    children: Vec<OsString>,
}

#[derive(Debug)]
pub struct MemoryFileSystem {
    entries: BTreeMap<PathBuf, MemoryEntry>,
    next_id: u64,
    next_mtime: i64,
    accessed: Mutex<Vec<PathBuf>>,
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} does not exist", path.display()),
    )
}

impl MemoryFileSystem {
    /// Creates a filesystem holding a single empty directory at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let mut fs = Self {
            entries: Default::default(),
            next_id: 1,
            next_mtime: 1,
            accessed: Default::default(),
        };
        let fsid = fs.allocate_id();
        fs.entries.insert(
            root.into(),
            MemoryEntry {
                file_type: FileType::Directory,
                content: vec![],
                mtime: 0,
                fsid: Some(fsid),
                openable: true,
                readable: true,
                children: vec![],
            },
        );
        fs
    }

    fn allocate_id(&mut self) -> FsId {
        let id = FsId(self.next_id);
        self.next_id += 1;
        id
    }

    fn insert(&mut self, path: &Path, file_type: FileType, content: Vec<u8>) -> io::Result<FsId> {
        if self.entries.contains_key(path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} already exists", path.display()),
            ));
        }
        let (parent, name) = match (path.parent(), path.file_name()) {
            (Some(parent), Some(name)) => (parent, name),
            _ => return Err(not_found(path)),
        };
        let parent_entry = self
            .entries
            .get_mut(parent)
            .filter(|e| e.file_type.is_dir())
            .ok_or_else(|| not_found(parent))?;
        parent_entry.children.push(name.to_owned());

        let mtime = if file_type.is_dir() {
            0
        } else {
            let mtime = self.next_mtime;
            self.next_mtime += 1;
            mtime
        };
        let fsid = self.allocate_id();
        self.entries.insert(
            path.to_owned(),
            MemoryEntry {
                file_type,
                content,
                mtime,
                fsid: Some(fsid),
                openable: true,
                readable: true,
                children: vec![],
            },
        );
        Ok(fsid)
    }

    pub fn add_dir(&mut self, path: impl AsRef<Path>) -> io::Result<FsId> {
        self.insert(path.as_ref(), FileType::Directory, vec![])
    }

    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) -> io::Result<FsId> {
        self.insert(path.as_ref(), FileType::File, content.into())
    }

    fn entry_mut(&mut self, path: &Path) -> io::Result<&mut MemoryEntry> {
        self.entries.get_mut(path).ok_or_else(|| not_found(path))
    }

    fn entry(&self, path: &Path) -> io::Result<&MemoryEntry> {
        self.entries.get(path).ok_or_else(|| not_found(path))
    }

    pub fn set_openable(&mut self, path: impl AsRef<Path>, openable: bool) -> io::Result<()> {
        self.entry_mut(path.as_ref())?.openable = openable;
        Ok(())
    }

    pub fn set_readable(&mut self, path: impl AsRef<Path>, readable: bool) -> io::Result<()> {
        self.entry_mut(path.as_ref())?.readable = readable;
        Ok(())
    }

    pub fn set_fsid(&mut self, path: impl AsRef<Path>, fsid: Option<FsId>) -> io::Result<()> {
        self.entry_mut(path.as_ref())?.fsid = fsid;
        Ok(())
    }

    pub fn set_mtime(&mut self, path: impl AsRef<Path>, mtime: i64) -> io::Result<()> {
        self.entry_mut(path.as_ref())?.mtime = mtime;
        Ok(())
    }

    pub fn set_file_type(&mut self, path: impl AsRef<Path>, file_type: FileType) -> io::Result<()> {
        self.entry_mut(path.as_ref())?.file_type = file_type;
        Ok(())
    }

    /// Gives `to` the content and modification time of `from`, as a copy
    /// that preserves mtime would.
    pub fn copy_content(&mut self, from: impl AsRef<Path>, to: impl AsRef<Path>) -> io::Result<()> {
        let source = self.entry(from.as_ref())?;
        let (content, mtime) = (source.content.clone(), source.mtime);
        let target = self.entry_mut(to.as_ref())?;
        target.content = content;
        target.mtime = mtime;
        Ok(())
    }

    /// Metadata of `path`, ignoring injected failures and without recording
    /// an access.
    pub fn stats(&self, path: impl AsRef<Path>) -> io::Result<FileStats> {
        let entry = self.entry(path.as_ref())?;
        Ok(FileStats {
            file_type: entry.file_type,
            size: entry.content.len() as u64,
            mtime: entry.mtime,
            fsid: entry.fsid,
        })
    }

    pub fn fsid(&self, path: impl AsRef<Path>) -> Option<FsId> {
        self.entries.get(path.as_ref()).and_then(|e| e.fsid)
    }

    /// Fingerprint the entry had when it was last scanned, ignoring injected
    /// failures.
    pub fn fingerprint(&self, path: impl AsRef<Path>) -> Option<Fingerprint> {
        let entry = self.entries.get(path.as_ref())?;
        match entry.file_type {
            FileType::Directory => Some(Fingerprint::of_directory(entry.mtime)),
            FileType::File => Some(Fingerprint::of_content(&entry.content, entry.mtime)),
            FileType::SymbolicLink | FileType::Unknown => None,
        }
    }

    /// Every path passed to `stat` or `read_dir` so far, in call order.
    pub fn accessed(&self) -> Vec<PathBuf> {
        self.accessed.lock().clone()
    }

    fn open(&self, path: &Path) -> io::Result<&MemoryEntry> {
        self.accessed.lock().push(path.to_owned());
        let entry = self.entry(path)?;
        if !entry.openable {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} cannot be opened", path.display()),
            ));
        }
        Ok(entry)
    }
}

impl FileSystemAccess for MemoryFileSystem {
    fn stat(&self, path: &Path) -> io::Result<FileStats> {
        self.open(path)?;
        self.stats(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<OsString>> {
        let entry = self.open(path)?;
        if !entry.file_type.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("{} is not a directory", path.display()),
            ));
        }
        Ok(entry.children.clone())
    }

    fn read_at(&self, path: &Path, offset: u64, len: usize) -> io::Result<Vec<u8>> {
        let entry = self.entry(path)?;
        if !entry.openable || !entry.readable {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} cannot be read", path.display()),
            ));
        }
        let start = offset as usize;
        entry
            .content
            .get(start..start + len)
            .map(|bytes| bytes.to_vec())
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "read past end of file"))
    }
}
