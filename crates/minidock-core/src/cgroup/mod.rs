//! Cgroup v1 resource management.
//!
//! Each kernel controller (memory, cpu, cpuset) is wrapped in a
//! [`Subsystem`] implementation that writes to its own mounted hierarchy.
//! A [`CgroupManager`] owns the container's sub-hierarchy path and fans
//! limit application, pid attachment, and teardown out to an ordered list
//! of subsystems.

pub mod cpu;
pub mod cpuset;
pub mod hierarchy;
pub mod memory;

use minidock_common::error::Result;
use minidock_common::types::ResourceConfig;

pub use cpu::CpuSubsystem;
pub use cpuset::CpusetSubsystem;
pub use memory::MemorySubsystem;

/// Capability set a cgroup controller implementation exposes.
///
/// `cgroup_path` is always relative to the controller's own mount point,
/// e.g. `minidock-cgroup/<container-id>`.
pub trait Subsystem: Send + Sync {
    /// Controller identifier used to resolve the kernel mount point.
    fn name(&self) -> &'static str;

    /// Writes the controller's limit into its sub-hierarchy, creating the
    /// directory if needed. A `None` limit is a no-op that touches nothing.
    ///
    /// # Errors
    ///
    /// Returns a `Cgroup` error naming the controller if the hierarchy
    /// cannot be created or the limit file cannot be written.
    fn set(&self, cgroup_path: &str, res: &ResourceConfig) -> Result<()>;

    /// Attaches `pid` to the (already created) sub-hierarchy by appending
    /// its decimal form to the controller's task list. A `None` limit is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns a `Cgroup` error if the hierarchy cannot be resolved or the
    /// write fails.
    fn apply(&self, cgroup_path: &str, pid: u32, res: &ResourceConfig) -> Result<()>;

    /// Recursively deletes the controller's sub-hierarchy. A hierarchy
    /// that does not exist is not an error.
    ///
    /// # Errors
    ///
    /// Returns a `Cgroup` error if an existing hierarchy cannot be removed.
    fn remove(&self, cgroup_path: &str) -> Result<()>;
}

/// The default, ordered controller list: memory first, then cpu and cpuset.
#[must_use]
pub fn default_subsystems() -> Vec<Box<dyn Subsystem>> {
    vec![
        Box::new(MemorySubsystem::default()),
        Box::new(CpuSubsystem::default()),
        Box::new(CpusetSubsystem::default()),
    ]
}

/// Owns a named cgroup sub-hierarchy shared by a fixed, ordered list of
/// controllers.
///
/// Fan-out is best-effort: the controllers write disjoint files,
/// so a failure in one (e.g. an unmounted memory hierarchy) must not stop
/// limits from applying to the others, and must never block teardown.
pub struct CgroupManager {
    /// Mount-relative sub-hierarchy path, `<manager-name>/<container-id>`.
    path: String,
    subsystems: Vec<Box<dyn Subsystem>>,
}

impl CgroupManager {
    /// Creates a manager over an explicit subsystem list.
    ///
    /// The list is fixed for the manager's lifetime; there is no global
    /// registry.
    #[must_use]
    pub fn new(
        manager_name: &str,
        container_id: &str,
        subsystems: Vec<Box<dyn Subsystem>>,
    ) -> Self {
        Self {
            path: format!("{manager_name}/{container_id}"),
            subsystems,
        }
    }

    /// Creates a manager over [`default_subsystems`].
    #[must_use]
    pub fn with_default_subsystems(manager_name: &str, container_id: &str) -> Self {
        Self::new(manager_name, container_id, default_subsystems())
    }

    /// The mount-relative sub-hierarchy path this manager owns.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Fans `set` out to every registered subsystem in order.
    ///
    /// # Errors
    ///
    /// Every subsystem is attempted; the first failure is returned after
    /// the fan-out completes.
    pub fn set(&self, res: &ResourceConfig) -> Result<()> {
        let mut first_err = None;
        for subsystem in &self.subsystems {
            if let Err(e) = subsystem.set(&self.path, res) {
                tracing::warn!(subsystem = subsystem.name(), error = %e, "set limit failed");
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Fans `apply` out to every registered subsystem in order.
    ///
    /// # Errors
    ///
    /// Same semantics as [`Self::set`].
    pub fn apply(&self, pid: u32, res: &ResourceConfig) -> Result<()> {
        let mut first_err = None;
        for subsystem in &self.subsystems {
            if let Err(e) = subsystem.apply(&self.path, pid, res) {
                tracing::warn!(subsystem = subsystem.name(), pid, error = %e, "attach failed");
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Fans `remove` out to every registered subsystem.
    ///
    /// Failures are logged and swallowed; teardown always attempts to
    /// finish.
    pub fn destroy(&self) {
        for subsystem in &self.subsystems {
            if let Err(e) = subsystem.remove(&self.path) {
                tracing::warn!(subsystem = subsystem.name(), error = %e, "remove failed");
            }
        }
        tracing::debug!(path = %self.path, "cgroup destroyed");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use minidock_common::error::MinidockError;

    use super::*;

    /// Records calls; fails every operation when `fail` is set.
    struct ProbeSubsystem {
        name: &'static str,
        fail: bool,
        calls: &'static Mutex<Vec<String>>,
    }

    impl Subsystem for ProbeSubsystem {
        fn name(&self) -> &'static str {
            self.name
        }

        fn set(&self, cgroup_path: &str, _res: &ResourceConfig) -> Result<()> {
            self.calls
                .lock()
                .expect("lock")
                .push(format!("set:{}:{cgroup_path}", self.name));
            if self.fail {
                return Err(MinidockError::Cgroup {
                    subsystem: self.name,
                    message: "forced failure".into(),
                });
            }
            Ok(())
        }

        fn apply(&self, cgroup_path: &str, pid: u32, _res: &ResourceConfig) -> Result<()> {
            self.calls
                .lock()
                .expect("lock")
                .push(format!("apply:{}:{cgroup_path}:{pid}", self.name));
            Ok(())
        }

        fn remove(&self, cgroup_path: &str) -> Result<()> {
            self.calls
                .lock()
                .expect("lock")
                .push(format!("remove:{}:{cgroup_path}", self.name));
            if self.fail {
                return Err(MinidockError::Cgroup {
                    subsystem: self.name,
                    message: "forced failure".into(),
                });
            }
            Ok(())
        }
    }

    fn probe_calls() -> &'static Mutex<Vec<String>> {
        Box::leak(Box::new(Mutex::new(Vec::new())))
    }

    #[test]
    fn manager_path_joins_name_and_id() {
        let mgr = CgroupManager::new("mydocker-cgroup", "c1", Vec::new());
        assert_eq!(mgr.path(), "mydocker-cgroup/c1");
    }

    #[test]
    fn set_attempts_every_subsystem_past_failures() {
        let calls = probe_calls();
        let mgr = CgroupManager::new(
            "mgr",
            "c1",
            vec![
                Box::new(ProbeSubsystem { name: "memory", fail: true, calls }),
                Box::new(ProbeSubsystem { name: "cpu", fail: false, calls }),
            ],
        );

        let err = mgr.set(&ResourceConfig::default());
        assert!(err.is_err(), "first failure must surface");

        let recorded = calls.lock().expect("lock");
        assert_eq!(
            *recorded,
            vec!["set:memory:mgr/c1".to_string(), "set:cpu:mgr/c1".to_string()],
            "cpu must still be attempted after memory fails"
        );
    }

    #[test]
    fn destroy_swallows_failures() {
        let calls = probe_calls();
        let mgr = CgroupManager::new(
            "mgr",
            "c1",
            vec![
                Box::new(ProbeSubsystem { name: "memory", fail: true, calls }),
                Box::new(ProbeSubsystem { name: "cpu", fail: true, calls }),
            ],
        );

        mgr.destroy();

        let recorded = calls.lock().expect("lock");
        assert_eq!(recorded.len(), 2, "both removals attempted");
    }

    #[test]
    fn apply_passes_pid_through() {
        let calls = probe_calls();
        let mgr = CgroupManager::new(
            "mgr",
            "c1",
            vec![Box::new(ProbeSubsystem { name: "memory", fail: false, calls })],
        );

        mgr.apply(4321, &ResourceConfig::default()).expect("apply");

        let recorded = calls.lock().expect("lock");
        assert_eq!(*recorded, vec!["apply:memory:mgr/c1:4321".to_string()]);
    }
}
