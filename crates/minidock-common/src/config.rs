//! Global configuration model for the minidock runtime.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Paths the runtime operates on.
///
/// All launch-time path decisions flow through this struct so tests and
/// non-standard installations can redirect them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Base directory for container records and log files.
    pub data_dir: PathBuf,
    /// Workspace root under which lower/upper/work/merged live.
    pub workspace_root: PathBuf,
    /// Base image archive extracted into the lower layer.
    pub image_tar: PathBuf,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let workspace_root = crate::constants::default_workspace_root();
        let image_tar = workspace_root.join(crate::constants::BASE_IMAGE_ARCHIVE);
        Self {
            data_dir: PathBuf::from(crate::constants::DEFAULT_DATA_DIR),
            workspace_root,
            image_tar,
        }
    }
}

impl RuntimeConfig {
    /// Directory holding per-container records and logs.
    #[must_use]
    pub fn containers_dir(&self) -> PathBuf {
        crate::constants::containers_dir(&self.data_dir)
    }
}
