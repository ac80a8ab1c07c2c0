//! Memory controller subsystem.
//!
//! Writes the raw limit value into `memory.limit_in_bytes` and attaches
//! pids via the shared `tasks` file.

use std::path::PathBuf;

use minidock_common::error::{MinidockError, Result};
use minidock_common::types::ResourceConfig;

use super::Subsystem;
use super::hierarchy::{self, TASKS_FILE};

/// Limit file of the v1 memory controller.
pub const MEMORY_LIMIT_FILE: &str = "memory.limit_in_bytes";

/// Memory controller implementation.
///
/// By default the controller mount is resolved from the process's mount
/// table; [`MemorySubsystem::rooted_at`] pins it to a known hierarchy
/// instead (tests, non-standard mounts).
#[derive(Debug, Default)]
pub struct MemorySubsystem {
    mount_root: Option<PathBuf>,
}

impl MemorySubsystem {
    /// Creates a subsystem resolving against a fixed mount root.
    #[must_use]
    pub fn rooted_at(mount_root: impl Into<PathBuf>) -> Self {
        Self {
            mount_root: Some(mount_root.into()),
        }
    }
}

impl Subsystem for MemorySubsystem {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn set(&self, cgroup_path: &str, res: &ResourceConfig) -> Result<()> {
        let Some(limit) = res.memory_limit.as_deref() else {
            return Ok(());
        };
        let dir =
            hierarchy::subsystem_dir(self.mount_root.as_deref(), self.name(), cgroup_path, true)?;
        let file = dir.join(MEMORY_LIMIT_FILE);
        std::fs::write(&file, limit).map_err(|e| MinidockError::Cgroup {
            subsystem: self.name(),
            message: format!("writing {}: {e}", file.display()),
        })?;
        tracing::debug!(limit, path = %dir.display(), "memory limit set");
        Ok(())
    }

    fn apply(&self, cgroup_path: &str, pid: u32, res: &ResourceConfig) -> Result<()> {
        if res.memory_limit.is_none() {
            return Ok(());
        }
        let dir =
            hierarchy::subsystem_dir(self.mount_root.as_deref(), self.name(), cgroup_path, false)?;
        let file = dir.join(TASKS_FILE);
        std::fs::write(&file, pid.to_string()).map_err(|e| MinidockError::Cgroup {
            subsystem: self.name(),
            message: format!("attaching pid {pid}: {e}"),
        })?;
        tracing::debug!(pid, path = %dir.display(), "pid attached to memory cgroup");
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

    fn limited(limit: &str) -> ResourceConfig {
        ResourceConfig {
            memory_limit: Some(limit.to_string()),
            ..ResourceConfig::default()
        }
    }

    #[test]
    fn unconstrained_config_performs_no_writes() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let subsystem = MemorySubsystem::rooted_at(tmp.path());

        subsystem
            .set("mgr/c1", &ResourceConfig::default())
            .expect("set");
        subsystem
            .apply("mgr/c1", 4321, &ResourceConfig::default())
            .expect("apply");

        assert!(
            std::fs::read_dir(tmp.path()).expect("read_dir").next().is_none(),
            "no files or directories may be created"
        );
    }

    #[test]
    fn set_writes_raw_limit_value() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let subsystem = MemorySubsystem::rooted_at(tmp.path());

        subsystem.set("mgr/c1", &limited("100m")).expect("set");

        let written =
            std::fs::read_to_string(tmp.path().join("mgr/c1").join(MEMORY_LIMIT_FILE))
                .expect("limit file");
        assert_eq!(written, "100m");
    }

    #[test]
    fn apply_writes_decimal_pid() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let subsystem = MemorySubsystem::rooted_at(tmp.path());

        subsystem.set("mgr/c1", &limited("100m")).expect("set");
        subsystem.apply("mgr/c1", 4321, &limited("100m")).expect("apply");

        let written = std::fs::read_to_string(tmp.path().join("mgr/c1").join(TASKS_FILE))
            .expect("tasks file");
        assert_eq!(written, "4321");
    }

    #[test]
    fn apply_without_hierarchy_fails() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let subsystem = MemorySubsystem::rooted_at(tmp.path());

        let result = subsystem.apply("mgr/c1", 4321, &limited("100m"));
        assert!(result.is_err(), "tasks file cannot exist without set");
    }

    #[test]
    fn remove_is_idempotent() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let subsystem = MemorySubsystem::rooted_at(tmp.path());

        subsystem.set("mgr/c1", &limited("100m")).expect("set");
        subsystem.remove("mgr/c1").expect("first remove");
        assert!(!tmp.path().join("mgr/c1").exists());

        subsystem.remove("mgr/c1").expect("second remove is a no-op");
    }
}
