//! Filesystem vocabulary shared by the tracker and the reconciler: entry
//! types, native identifiers, content fingerprints and the access contract
//! the reconciler consumes.

mod access;
mod file_id;
mod file_stats;
mod file_type;
mod fingerprint;
pub mod memory;

pub use access::*;
pub use file_id::*;
pub use file_stats::*;
pub use file_type::*;
pub use fingerprint::*;
