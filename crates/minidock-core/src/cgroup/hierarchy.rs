//! Cgroup v1 hierarchy resolution.
//!
//! Each controller lives at its own mount point on a v1 host. The mount is
//! located by inspecting the calling process's own mount table for a
//! `cgroup` filesystem whose super options name the controller.

use std::os::unix::fs::DirBuilderExt;
use std::path::{Path, PathBuf};

use minidock_common::error::{MinidockError, Result};

const MOUNTINFO: &str = "/proc/self/mountinfo";

/// Task-attach file shared by all v1 controllers.
pub const TASKS_FILE: &str = "tasks";

/// Locates the host mount point for the named cgroup controller.
///
/// # Errors
///
/// Returns a `Cgroup` error if the mount table cannot be read or no
/// mounted hierarchy carries the controller.
pub fn controller_mount(subsystem: &'static str) -> Result<PathBuf> {
    let content = std::fs::read_to_string(MOUNTINFO).map_err(|e| MinidockError::Cgroup {
        subsystem,
        message: format!("reading {MOUNTINFO}: {e}"),
    })?;
    parse_mountinfo(&content, subsystem).ok_or_else(|| MinidockError::Cgroup {
        subsystem,
        message: format!("no cgroup mount found for controller {subsystem}"),
    })
}

/// Extracts the mount point of the controller from mountinfo content.
///
/// A mountinfo line reads
/// `36 35 0:30 / /sys/fs/cgroup/memory rw,relatime shared:15 - cgroup cgroup rw,memory`;
/// the separator `-` splits mount fields from the filesystem type and its
/// super options, which carry the controller names.
fn parse_mountinfo(content: &str, subsystem: &str) -> Option<PathBuf> {
    for line in content.lines() {
        let Some((mount_fields, fs_fields)) = line.split_once(" - ") else {
            continue;
        };
        let mut fs_parts = fs_fields.split_whitespace();
        if fs_parts.next() != Some("cgroup") {
            continue;
        }
        let _source = fs_parts.next();
        let Some(super_opts) = fs_parts.next() else {
            continue;
        };
        if super_opts.split(',').any(|opt| opt == subsystem) {
            return mount_fields.split_whitespace().nth(4).map(PathBuf::from);
        }
    }
    None
}

/// Resolves the controller-relative directory for `cgroup_path`.
///
/// With `create` set, the directory is created (mode `0o755`) if absent,
/// used by writes that establish the hierarchy. Resolution for reads and
/// removals never creates.
///
/// # Errors
///
/// Returns a `Cgroup` error if the controller mount cannot be located or
/// the directory cannot be created.
pub fn subsystem_dir(
    mount_root: Option<&Path>,
    subsystem: &'static str,
    cgroup_path: &str,
    create: bool,
) -> Result<PathBuf> {
    let root = match mount_root {
        Some(root) => root.to_path_buf(),
        None => controller_mount(subsystem)?,
    };
    let dir = root.join(cgroup_path);
    if create && !dir.exists() {
        std::fs::DirBuilder::new()
            .recursive(true)
            .mode(0o755)
            .create(&dir)
            .map_err(|e| MinidockError::Cgroup {
                subsystem,
                message: format!("creating {}: {e}", dir.display()),
            })?;
    }
    Ok(dir)
}
