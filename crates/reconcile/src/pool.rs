use std::collections::{HashMap, HashSet};

use file::{FileType, Fingerprint, FsId};
use smallvec::SmallVec;
use utils::PathTools;

use crate::SnapshotEntry;

type Bucket = SmallVec<[usize; 4]>;

/// Unclaimed snapshot entries grouped by `(fingerprint, type)`.
///
/// Each bucket keeps entry positions in enumeration order; an entry leaves
/// its bucket once claimed and can not be handed out twice. Entries sharing
/// an identifier (hard links) are withheld once one of them is claimed.
pub struct CandidatePool<'a> {
    entries: &'a [SnapshotEntry],
    buckets: HashMap<(Fingerprint, FileType), Bucket>,
    claimed: HashSet<FsId>,
}

impl<'a> CandidatePool<'a> {
    pub fn new(entries: &'a [SnapshotEntry]) -> Self {
        let mut buckets: HashMap<_, Bucket> = HashMap::new();
        for (position, entry) in entries.iter().enumerate() {
            buckets
                .entry((entry.fingerprint, entry.file_type))
                .or_default()
                .push(position);
        }
        Self {
            entries,
            buckets,
            claimed: HashSet::new(),
        }
    }

    /// Unclaimed entries sharing `fingerprint` and `file_type` whose
    /// identifier is still free, in enumeration order.
    pub fn candidates(
        &self,
        fingerprint: Fingerprint,
        file_type: FileType,
    ) -> impl Iterator<Item = (usize, &'a SnapshotEntry)> + '_ {
        let entries = self.entries;
        let claimed = &self.claimed;
        self.buckets
            .get(&(fingerprint, file_type))
            .into_iter()
            .flatten()
            .map(move |position| (*position, &entries[*position]))
            .filter(move |(_, entry)| !claimed.contains(&entry.fsid))
    }

    /// Picks the candidate whose path shares the longest trailing structure
    /// with `path`. The earliest candidate wins ties, candidates scoring below
    /// `min_score` are not considered.
    pub fn best_match(
        &self,
        fingerprint: Fingerprint,
        file_type: FileType,
        path: &str,
        min_score: usize,
    ) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for (position, entry) in self.candidates(fingerprint, file_type) {
            let score = PathTools::reverse_match_score(path, &PathTools::lossy(&entry.path));
            if score < min_score {
                continue;
            }
            if best.map(|(_, best_score)| score > best_score).unwrap_or(true) {
                best = Some((position, score));
            }
        }
        best.map(|(position, _)| position)
    }

    /// Removes the entry at `position` from the pool and returns it, `None`
    /// if it or another entry with its identifier was already claimed.
    pub fn claim(&mut self, position: usize) -> Option<&'a SnapshotEntry> {
        let entry = self.entries.get(position)?;
        if self.claimed.contains(&entry.fsid) {
            return None;
        }
        let key = (entry.fingerprint, entry.file_type);
        let bucket = self.buckets.get_mut(&key)?;
        let index = bucket.iter().position(|p| *p == position)?;
        bucket.remove(index);
        if bucket.is_empty() {
            self.buckets.remove(&key);
        }
        self.claimed.insert(entry.fsid);
        Some(entry)
    }

    /// Number of entries that can still be claimed.
    pub fn len(&self) -> usize {
        self.buckets
            .values()
            .flatten()
            .filter(|position| !self.claimed.contains(&self.entries[**position].fsid))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use file::{FileType, Fingerprint, FsId};

    use crate::SnapshotEntry;

    use super::CandidatePool;

    fn entry(path: &str, fsid: u64, fingerprint: Fingerprint) -> SnapshotEntry {
        SnapshotEntry {
            path: PathBuf::from(path),
            file_type: FileType::File,
            fsid: FsId(fsid),
            fingerprint,
        }
    }

    #[test]
    fn buckets_keep_enumeration_order() {
        let a = Fingerprint::of_content(b"a", 1);
        let b = Fingerprint::of_content(b"b", 2);
        let entries = vec![entry("/d/x", 1, a), entry("/d/y", 2, b), entry("/d/z", 3, a)];
        let pool = CandidatePool::new(&entries);

        let found = pool
            .candidates(a, FileType::File)
            .map(|(p, _)| p)
            .collect::<Vec<_>>();
        assert_eq!(found, vec![0, 2]);
        assert_eq!(pool.candidates(a, FileType::Directory).count(), 0);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn claim_removes_once() {
        let a = Fingerprint::of_content(b"a", 1);
        let entries = vec![entry("/d/x", 1, a), entry("/d/z", 2, a)];
        let mut pool = CandidatePool::new(&entries);

        assert_eq!(pool.claim(0).map(|e| e.fsid), Some(FsId(1)));
        assert!(pool.claim(0).is_none());
        assert_eq!(pool.candidates(a, FileType::File).count(), 1);
        assert!(pool.claim(1).is_some());
        assert!(pool.is_empty());
        assert!(pool.claim(5).is_none());
    }

    #[test]
    fn shared_identifier_is_claimed_once() {
        let a = Fingerprint::of_content(b"a", 1);
        let b = Fingerprint::of_content(b"b", 2);
        let entries = vec![entry("/d/x", 7, a), entry("/d/y", 7, a), entry("/d/z", 7, b)];
        let mut pool = CandidatePool::new(&entries);
        assert_eq!(pool.len(), 3);

        assert!(pool.claim(0).is_some());
        assert_eq!(pool.candidates(a, FileType::File).count(), 0);
        assert_eq!(pool.best_match(a, FileType::File, "/d/y", 0), None);
        assert!(pool.claim(1).is_none());
        assert!(pool.claim(2).is_none());
        assert!(pool.is_empty());
    }

    #[test]
    fn best_match_prefers_path_then_order() {
        let a = Fingerprint::of_content(b"a", 1);
        let entries = vec![
            entry("/d/other/f", 1, a),
            entry("/d/sub/f", 2, a),
            entry("/d/again/f", 3, a),
        ];
        let pool = CandidatePool::new(&entries);

        assert_eq!(pool.best_match(a, FileType::File, "/d/sub/f", 0), Some(1));
        // "f" ties between all three
        assert_eq!(pool.best_match(a, FileType::File, "/e/f", 0), Some(0));
        assert_eq!(pool.best_match(a, FileType::File, "/e/g", 0), Some(0));
        assert_eq!(pool.best_match(a, FileType::File, "/e/g", 1), None);
        assert_eq!(
            pool.best_match(Fingerprint::of_content(b"b", 1), FileType::File, "/d/sub/f", 0),
            None
        );
    }
}
