#[repr(u8)]
#[derive(
    Debug,
    Copy,
    Clone,
    Hash,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    num_enum::IntoPrimitive,
    num_enum::TryFromPrimitive,
)]
pub enum FileType {
    File = 0,
    Directory = 1,
    SymbolicLink = 2,
    /// Sockets, fifos, devices and anything else the platform reports.
    Unknown = 3,
}

impl FileType {
    pub fn is_file(&self) -> bool {
        matches!(self, FileType::File)
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, FileType::Directory)
    }
}

impl Default for FileType {
    fn default() -> Self {
        Self::File
    }
}

impl From<std::fs::FileType> for FileType {
    fn from(value: std::fs::FileType) -> Self {
        if value.is_symlink() {
            FileType::SymbolicLink
        } else if value.is_dir() {
            FileType::Directory
        } else if value.is_file() {
            FileType::File
        } else {
            FileType::Unknown
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            FileType::File => "file",
            FileType::Directory => "directory",
            FileType::SymbolicLink => "symlink",
            FileType::Unknown => "unknown",
        })
    }
}
