use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfiguration {
    /// Name of the directory under the sync root where deleted entries are
    /// parked. Nothing below it is scanned or matched.
    pub debris_name: String,
    /// Candidates whose reverse path score is below this are ignored, even
    /// when they are the only ones with the right fingerprint.
    pub min_match_score: usize,
}

impl Default for ReconcileConfiguration {
    fn default() -> Self {
        Self {
            debris_name: ".debris".to_owned(),
            min_match_score: 0,
        }
    }
}

impl ReconcileConfiguration {
    pub fn debris_path(&self, root: &Path) -> PathBuf {
        root.join(&self.debris_name)
    }
}
