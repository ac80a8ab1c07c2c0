//! CPU controller subsystem (`cpu.shares`).

use std::path::PathBuf;

use minidock_common::error::{MinidockError, Result};
use minidock_common::types::ResourceConfig;

use super::Subsystem;
use super::hierarchy::{self, TASKS_FILE};

/// Limit file of the v1 cpu controller.
pub const CPU_SHARES_FILE: &str = "cpu.shares";

/// CPU-share controller implementation.
#[derive(Debug, Default)]
pub struct CpuSubsystem {
    mount_root: Option<PathBuf>,
}

impl CpuSubsystem {
    /// Creates a subsystem resolving against a fixed mount root.
    #[must_use]
    pub fn rooted_at(mount_root: impl Into<PathBuf>) -> Self {
        Self {
            mount_root: Some(mount_root.into()),
        }
    }
}

impl Subsystem for CpuSubsystem {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn set(&self, cgroup_path: &str, res: &ResourceConfig) -> Result<()> {
        let Some(shares) = res.cpu_shares.as_deref() else {
            return Ok(());
        };
        let dir =
            hierarchy::subsystem_dir(self.mount_root.as_deref(), self.name(), cgroup_path, true)?;
        let file = dir.join(CPU_SHARES_FILE);
        std::fs::write(&file, shares).map_err(|e| MinidockError::Cgroup {
            subsystem: self.name(),
            message: format!("writing {}: {e}", file.display()),
        })?;
        tracing::debug!(shares, path = %dir.display(), "cpu shares set");
        Ok(())
    }

    fn apply(&self, cgroup_path: &str, pid: u32, res: &ResourceConfig) -> Result<()> {
        if res.cpu_shares.is_none() {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_writes_shares_value() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let subsystem = CpuSubsystem::rooted_at(tmp.path());
        let res = ResourceConfig {
            cpu_shares: Some("512".to_string()),
            ..ResourceConfig::default()
        };

        subsystem.set("mgr/c1", &res).expect("set");

        let written = std::fs::read_to_string(tmp.path().join("mgr/c1").join(CPU_SHARES_FILE))
            .expect("shares file");
        assert_eq!(written, "512");
    }

    #[test]
    fn unrelated_limits_do_not_trigger_writes() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let subsystem = CpuSubsystem::rooted_at(tmp.path());
        let res = ResourceConfig {
            memory_limit: Some("100m".to_string()),
            ..ResourceConfig::default()
        };

        subsystem.set("mgr/c1", &res).expect("set");
        assert!(!tmp.path().join("mgr/c1").exists());
    }
}
