use std::path::Path;

use file::{FileSystemAccess, Syncable};
use tracing::{debug, info, instrument, warn};
use tracker::{IdentifierIndex, TrackedTree};
use utils::PathTools;

use crate::{CandidatePool, ReconcileConfiguration, Result, SnapshotWalker, WalkError};

/// Outcome of one reconciliation pass.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    /// Nodes that hold an identifier from this pass.
    pub assigned: usize,
    /// Visited nodes left without an identifier, the root included.
    pub unmatched: usize,
    /// Nodes under the debris path, left as they were.
    pub skipped: usize,
    pub failures: Vec<WalkError>,
}

impl ReconcileReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Re-establishes the filesystem identifier of every tracked node from the
/// current state of the disk.
///
/// The disk is enumerated once, then the tracked tree is visited parents
/// first. Each node claims the unclaimed entry with the same fingerprint and
/// type whose path ends most like the node's own path. Nodes without such an
/// entry lose their identifier.
pub struct Reconciler<'a, F, S> {
    fs: &'a F,
    syncable: &'a S,
    config: ReconcileConfiguration,
}

impl<'a, F: FileSystemAccess, S: Syncable> Reconciler<'a, F, S> {
    pub fn new(fs: &'a F, syncable: &'a S) -> Self {
        Self::with_config(fs, syncable, ReconcileConfiguration::default())
    }

    pub fn with_config(fs: &'a F, syncable: &'a S, config: ReconcileConfiguration) -> Self {
        Self {
            fs,
            syncable,
            config,
        }
    }

    /// Runs a pass with the debris directory taken from the configuration.
    pub fn run(
        &self,
        tree: &mut TrackedTree,
        real_root: &Path,
        index: &mut IdentifierIndex,
    ) -> Result<ReconcileReport> {
        let debris = self.config.debris_path(real_root);
        self.run_with_debris(tree, real_root, index, &debris)
    }

    #[instrument(skip_all, fields(root = %real_root.display()))]
    pub fn run_with_debris(
        &self,
        tree: &mut TrackedTree,
        real_root: &Path,
        index: &mut IdentifierIndex,
        debris: &Path,
    ) -> Result<ReconcileReport> {
        let snapshot = SnapshotWalker::new(self.fs, self.syncable, debris).walk(real_root);
        for failure in snapshot.failures.iter() {
            warn!("{failure}");
        }

        let mut report = ReconcileReport::default();
        if !snapshot.root_opened() {
            report.failures = snapshot.failures;
            return Ok(report);
        }

        let mut pool = CandidatePool::new(&snapshot.entries);
        let mut stack = vec![tree.root()];
        while let Some(id) = stack.pop() {
            let path = real_root.join(tree.relative_path(id)?);
            if id != tree.root() && PathTools::is_within(&path, debris) {
                report.skipped += tree.iter_preorder_from(id).count();
                continue;
            }

            let node = tree.node(id)?;
            stack.extend(node.children().iter().rev());
            let fingerprint = node.fingerprint();
            let file_type = node.file_type();

            let matched = match fingerprint {
                Some(fingerprint) if id != tree.root() => pool
                    .best_match(
                        fingerprint,
                        file_type,
                        &PathTools::lossy(&path),
                        self.config.min_match_score,
                    )
                    .and_then(|position| pool.claim(position)),
                _ => None,
            };

            match matched {
                Some(entry) => {
                    if let Some(evicted) = index.assign(tree, id, entry.fsid)? {
                        debug!(?evicted, fsid = %entry.fsid, "identifier moved");
                    }
                    debug!(path = ?path, found = ?entry.path, fsid = %entry.fsid, "assigned");
                    report.assigned += 1;
                }
                None => {
                    if let Some(stale) = index.unassign(tree, id)? {
                        debug!(path = ?path, fsid = %stale, "unassigned");
                    }
                    report.unmatched += 1;
                }
            }
        }

        report.failures = snapshot.failures;
        info!(
            assigned = report.assigned,
            unmatched = report.unmatched,
            skipped = report.skipped,
            failures = report.failures.len(),
            "reconciled"
        );
        Ok(report)
    }
}

/// Runs one pass with default settings and reports whether the filesystem
/// was enumerated without any failure.
pub fn reconcile(
    tree: &mut TrackedTree,
    real_root: &Path,
    index: &mut IdentifierIndex,
    debris: &Path,
    fs: &impl FileSystemAccess,
    syncable: &impl Syncable,
) -> bool {
    matches!(
        Reconciler::new(fs, syncable).run_with_debris(tree, real_root, index, debris),
        Ok(report) if report.is_success()
    )
}

