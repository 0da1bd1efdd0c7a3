use std::{io, path::Path};

use utils::{Digestible, Xxhash};

use crate::{FileStats, FileSystemAccess, FileType};

/// Identity of an entry's content.
///
/// Validity is carried by the surrounding `Option`: an entry whose
/// fingerprint could not be computed holds `None`, which never matches
/// anything.
///
/// Directories have no content; their fingerprint is built from metadata
/// alone (`size` and `checksum` are zero) and routinely coincides between
/// unrelated directories.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fingerprint {
    pub size: u64,
    pub mtime: i64,
    pub checksum: u64,
}

impl Fingerprint {
    /// Files up to this size are hashed whole.
    pub const FULL_READ_LIMIT: u64 = 64 * 1024;
    /// Number of blocks sampled from larger files.
    pub const SAMPLE_COUNT: u64 = 8;
    pub const SAMPLE_SIZE: u64 = 4 * 1024;

    pub fn of_directory(mtime: i64) -> Self {
        Self {
            size: 0,
            mtime,
            checksum: 0,
        }
    }

    /// Fingerprint of in-memory content.
    pub fn of_content(content: &[u8], mtime: i64) -> Self {
        let size = content.len() as u64;
        let mut hash = Xxhash::new();
        for (offset, len) in Self::sample_ranges(size) {
            content[offset as usize..(offset + len) as usize].digest(&mut hash);
        }
        Self {
            size,
            mtime,
            checksum: hash.finish(),
        }
    }

    /// Computes the fingerprint of the entry at `path`, reading sampled
    /// content through `fs` for regular files.
    ///
    /// Returns `Ok(None)` for entry types that have no fingerprint.
    pub fn compute(
        fs: &impl FileSystemAccess,
        path: &Path,
        stats: &FileStats,
    ) -> io::Result<Option<Self>> {
        match stats.file_type {
            FileType::Directory => Ok(Some(Self::of_directory(stats.mtime))),
            FileType::File => {
                let mut hash = Xxhash::new();
                if stats.size == 0 {
                    fs.read_at(path, 0, 0)?;
                }
                for (offset, len) in Self::sample_ranges(stats.size) {
                    let block = fs.read_at(path, offset, len as usize)?;
                    if block.len() as u64 != len {
                        return Err(io::Error::new(
                            io::ErrorKind::UnexpectedEof,
                            format!("short read at {offset} in {}", path.display()),
                        ));
                    }
                    block.digest(&mut hash);
                }
                Ok(Some(Self {
                    size: stats.size,
                    mtime: stats.mtime,
                    checksum: hash.finish(),
                }))
            }
            FileType::SymbolicLink | FileType::Unknown => Ok(None),
        }
    }

    /// `(offset, len)` of every block that contributes to the checksum.
    fn sample_ranges(size: u64) -> Vec<(u64, u64)> {
        if size == 0 {
            vec![]
        } else if size <= Self::FULL_READ_LIMIT {
            vec![(0, size)]
        } else {
            let span = size - Self::SAMPLE_SIZE;
            (0..Self::SAMPLE_COUNT)
                .map(|i| (span * i / (Self::SAMPLE_COUNT - 1), Self::SAMPLE_SIZE))
                .collect()
        }
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}b@{}:{:016x}", self.size, self.mtime, self.checksum)
    }
}
