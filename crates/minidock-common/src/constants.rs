//! System-wide constants and default paths.

use std::path::PathBuf;

/// Base directory for minidock state and data.
pub const DEFAULT_DATA_DIR: &str = "/var/lib/minidock";

/// Directory holding one subdirectory per container (record + log file).
#[must_use]
pub fn containers_dir(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("containers")
}

/// Default directory holding the overlay workspace (lower/upper/work/merged).
#[must_use]
pub fn default_workspace_root() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR).join("rootfs")
}

/// Name of the base image archive expected under the workspace root.
pub const BASE_IMAGE_ARCHIVE: &str = "busybox.tar";

/// Common sub-hierarchy segment for all minidock cgroups.
pub const CGROUP_MANAGER_NAME: &str = "minidock-cgroup";

/// File name of the persisted container record.
pub const CONTAINER_CONFIG_NAME: &str = "config.json";

/// File descriptor slot at which the init process inherits the command pipe.
///
/// Contract between the launcher (which dups the pipe's read end onto this
/// slot) and the init bootstrapper (which reads the command from it).
pub const INIT_PIPE_FD: i32 = 3;

/// Application name used in CLI output and state files.
pub const APP_NAME: &str = "minidock";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "minidock";
