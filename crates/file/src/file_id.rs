/// File system level file identifier, e.g. inode number in linux, file_id in
/// windows.
///
/// https://man7.org/linux/man-pages/man7/inode.7.html
/// https://learn.microsoft.com/en-us/windows/win32/api/winbase/ns-winbase-file_id_info
///
/// An entry without an identifier is represented as `Option<FsId>::None`,
/// there is no sentinel value.
#[derive(
    Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct FsId(pub u64);

impl std::fmt::Display for FsId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for FsId {
    fn from(value: u64) -> Self {
        FsId(value)
    }
}

/// Opaque handle of the remote counterpart of a local entry. Only passed
/// through to the [`crate::Syncable`] predicate.
#[derive(
    Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct NodeHandle(pub u64);
