//! Domain primitive types used across the minidock workspace.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of characters in a generated container ID.
pub const CONTAINER_ID_LENGTH: usize = 12;

/// Unique identifier for a container instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerId(String);

impl ContainerId {
    /// Creates a container ID from an existing string value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a random, fixed-length container ID.
    ///
    /// The ID is opaque; callers must not derive meaning from its contents.
    #[must_use]
    pub fn generate() -> Self {
        let hex = uuid::Uuid::new_v4().simple().to_string();
        Self(hex[..CONTAINER_ID_LENGTH].to_string())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a container, as persisted in its record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerStatus {
    /// Container process is running.
    Running,
    /// Container was stopped by an external signal.
    Stopped,
    /// Container process exited on its own.
    Exited,
}

impl fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Stopped => write!(f, "stopped"),
            Self::Exited => write!(f, "exited"),
        }
    }
}

/// Resource limits applied to a container's cgroup.
///
/// Each field holds the raw value written to the controller's limit file,
/// in the kernel's own format (e.g. `"100m"` for memory). `None` means the
/// controller is left unconstrained and never touched on disk.
///
/// A config is immutable once handed to a launch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Memory limit as a kernel-format byte quantity (`memory.limit_in_bytes`).
    pub memory_limit: Option<String>,
    /// Relative CPU weight (`cpu.shares`).
    pub cpu_shares: Option<String>,
    /// CPU cores the container may run on (`cpuset.cpus`).
    pub cpuset_cpus: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_have_fixed_length() {
        let id = ContainerId::generate();
        assert_eq!(id.as_str().len(), CONTAINER_ID_LENGTH);
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(ContainerId::generate(), ContainerId::generate());
    }

    #[test]
    fn status_display_matches_record_format() {
        assert_eq!(ContainerStatus::Running.to_string(), "running");
        assert_eq!(ContainerStatus::Stopped.to_string(), "stopped");
        assert_eq!(ContainerStatus::Exited.to_string(), "exited");
    }

    #[test]
    fn default_resource_config_is_unconstrained() {
        let res = ResourceConfig::default();
        assert!(res.memory_limit.is_none());
        assert!(res.cpu_shares.is_none());
        assert!(res.cpuset_cpus.is_none());
    }
}
