use crate::{FileType, FsId};

/// What opening a path reports, without following symbolic links.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Default)]
pub struct FileStats {
    pub file_type: FileType,
    /// the size of the file, in bytes.
    pub size: u64,
    /// last modification time, seconds since the unix epoch.
    pub mtime: i64,
    pub fsid: Option<FsId>,
}
