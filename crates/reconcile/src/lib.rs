//! Re-establishes the filesystem identifiers of a tracked tree after the
//! filesystem changed behind its back, e.g. while the application was not
//! running.
//!
//! Matching is done on content fingerprint first and on how much of the path
//! two entries share, counted from the leaf, second. See [`Reconciler`].

mod config;
mod error;
mod pool;
mod reconciler;
mod walker;

pub use config::*;
pub use error::*;
pub use pool::*;
pub use reconciler::*;
pub use walker::*;

use utils::PathTools;

/// Length of the trailing path components `path1` and `path2` have in
/// common, using the platform separator.
pub fn compute_reverse_path_match_score(path1: &str, path2: &str) -> usize {
    PathTools::reverse_match_score(path1, path2)
}
