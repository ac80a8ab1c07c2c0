//! Cpuset controller subsystem (`cpuset.cpus`).

use std::path::PathBuf;

use minidock_common::error::{MinidockError, Result};
use minidock_common::types::ResourceConfig;

use super::Subsystem;
use super::hierarchy::{self, TASKS_FILE};

/// Limit file of the v1 cpuset controller.
pub const CPUSET_CPUS_FILE: &str = "cpuset.cpus";

/// Cpuset controller implementation.
#[derive(Debug, Default)]
pub struct CpusetSubsystem {
    mount_root: Option<PathBuf>,
}

impl CpusetSubsystem {
    /// Creates a subsystem resolving against a fixed mount root.
    #[must_use]
    pub fn rooted_at(mount_root: impl Into<PathBuf>) -> Self {
        Self {
            mount_root: Some(mount_root.into()),
        }
    }
}

impl Subsystem for CpusetSubsystem {
    fn name(&self) -> &'static str {
        "cpuset"
    }

    fn set(&self, cgroup_path: &str, res: &ResourceConfig) -> Result<()> {
        let Some(cpus) = res.cpuset_cpus.as_deref() else {
            return Ok(());
        };
        let dir =
            hierarchy::subsystem_dir(self.mount_root.as_deref(), self.name(), cgroup_path, true)?;
        let file = dir.join(CPUSET_CPUS_FILE);
        std::fs::write(&file, cpus).map_err(|e| MinidockError::Cgroup {
            subsystem: self.name(),
            message: format!("writing {}: {e}", file.display()),
        })?;
        tracing::debug!(cpus, path = %dir.display(), "cpuset set");
        Ok(())
    }

    fn apply(&self, cgroup_path: &str, pid: u32, res: &ResourceConfig) -> Result<()> {
        if res.cpuset_cpus.is_none() {
            return Ok(());
        }
        let dir =
            hierarchy::subsystem_dir(self.mount_root.as_deref(), self.name(), cgroup_path, false)?;
        let file = dir.join(TASKS_FILE);
        std::fs::write(&file, pid.to_string()).map_err(|e| MinidockError::Cgroup {
            subsystem: self.name(),
            message: format!("attaching pid {pid}: {e}"),
        })?;
        Ok(())
    }

    fn remove(&self, cgroup_path: &str) -> Result<()> {
        let dir =
            hierarchy::subsystem_dir(self.mount_root.as_deref(), self.name(), cgroup_path, false)?;
        match std::fs::remove_dir_all(&dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MinidockError::Cgroup {
                subsystem: self.name(),
                message: format!("removing {}: {e}", dir.display()),
            }),
        }
    }
}
