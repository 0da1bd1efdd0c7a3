use std::{
    ops::ControlFlow,
    path::{Path, PathBuf},
};

use file::{FileSystemAccess, FileType, Fingerprint, FsId, Syncable};
use tracing::{debug, trace};
use utils::PathTools;

use crate::WalkError;

/// An entry found on disk during one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub path: PathBuf,
    pub file_type: FileType,
    pub fsid: FsId,
    pub fingerprint: Fingerprint,
}

/// Everything one walk produced. Entries are in enumeration order, which is
/// also the order ties between candidates are broken in.
#[derive(Debug, Default)]
pub struct Snapshot {
    pub entries: Vec<SnapshotEntry>,
    pub failures: Vec<WalkError>,
    root_opened: bool,
    aborted: bool,
}

impl Snapshot {
    /// False when the root itself could not be enumerated, in which case the
    /// snapshot is empty and says nothing about the tree.
    pub fn root_opened(&self) -> bool {
        self.root_opened
    }

    /// True if an unexpected entry stopped the walk before it was done.
    pub fn aborted(&self) -> bool {
        self.aborted
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Depth-first enumeration of a sync root through [`FileSystemAccess`].
///
/// Directories are entered in the order the filesystem lists them. Anything
/// at or under `debris` is never opened, anything the [`Syncable`] filter
/// rejects is treated as missing, symbolic links are not followed.
pub struct SnapshotWalker<'a, F, S> {
    fs: &'a F,
    syncable: &'a S,
    debris: &'a Path,
}

impl<'a, F: FileSystemAccess, S: Syncable> SnapshotWalker<'a, F, S> {
    pub fn new(fs: &'a F, syncable: &'a S, debris: &'a Path) -> Self {
        Self {
            fs,
            syncable,
            debris,
        }
    }

    pub fn walk(&self, root: &Path) -> Snapshot {
        let mut snapshot = Snapshot::default();

        let stats = match self.fs.stat(root) {
            Ok(stats) => stats,
            Err(source) => {
                snapshot.failures.push(WalkError::RootUnavailable {
                    path: root.to_owned(),
                    source,
                });
                return snapshot;
            }
        };
        if !stats.file_type.is_dir() {
            snapshot.failures.push(WalkError::RootNotDirectory {
                path: root.to_owned(),
            });
            return snapshot;
        }
        let names = match self.fs.read_dir(root) {
            Ok(names) => names,
            Err(source) => {
                snapshot.failures.push(WalkError::RootUnavailable {
                    path: root.to_owned(),
                    source,
                });
                return snapshot;
            }
        };

        snapshot.root_opened = true;
        let children = names.into_iter().map(|n| root.join(n)).collect();
        if self.walk_children(children, &mut snapshot).is_break() {
            snapshot.aborted = true;
        }
        snapshot
    }

    fn walk_children(&self, children: Vec<PathBuf>, snapshot: &mut Snapshot) -> ControlFlow<()> {
        for path in children {
            self.walk_entry(path, snapshot)?;
        }
        ControlFlow::Continue(())
    }

    fn walk_entry(&self, path: PathBuf, snapshot: &mut Snapshot) -> ControlFlow<()> {
        if PathTools::is_within(&path, self.debris) {
            trace!(?path, "skip debris");
            return ControlFlow::Continue(());
        }
        if !self.syncable.is_syncable(&path, None) {
            debug!(?path, "skip unsyncable");
            return ControlFlow::Continue(());
        }

        let stats = match self.fs.stat(&path) {
            Ok(stats) => stats,
            Err(source) => {
                snapshot.failures.push(WalkError::OpenFailed { path, source });
                return ControlFlow::Continue(());
            }
        };

        match stats.file_type {
            FileType::File => {
                let fingerprint = match Fingerprint::compute(self.fs, &path, &stats) {
                    Ok(Some(fingerprint)) => fingerprint,
                    Ok(None) => return ControlFlow::Continue(()),
                    Err(source) => {
                        snapshot.failures.push(WalkError::ReadFailed { path, source });
                        return ControlFlow::Continue(());
                    }
                };
                match stats.fsid {
                    Some(fsid) => snapshot.entries.push(SnapshotEntry {
                        path,
                        file_type: FileType::File,
                        fsid,
                        fingerprint,
                    }),
                    None => snapshot
                        .failures
                        .push(WalkError::MissingIdentifier { path }),
                }
                ControlFlow::Continue(())
            }
            FileType::Directory => {
                let names = match self.fs.read_dir(&path) {
                    Ok(names) => names,
                    Err(source) => {
                        snapshot.failures.push(WalkError::ListFailed { path, source });
                        return ControlFlow::Continue(());
                    }
                };
                let children = names.into_iter().map(|n| path.join(n)).collect();
                match stats.fsid {
                    Some(fsid) => snapshot.entries.push(SnapshotEntry {
                        path,
                        file_type: FileType::Directory,
                        fsid,
                        fingerprint: Fingerprint::of_directory(stats.mtime),
                    }),
                    None => snapshot
                        .failures
                        .push(WalkError::MissingIdentifier { path }),
                }
                self.walk_children(children, snapshot)
            }
            FileType::SymbolicLink => {
                trace!(?path, "skip symbolic link");
                ControlFlow::Continue(())
            }
            file_type @ FileType::Unknown => {
                snapshot
                    .failures
                    .push(WalkError::UnexpectedType { path, file_type });
                ControlFlow::Break(())
            }
        }
    }
}
