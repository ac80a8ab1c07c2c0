//! Persisted container records.
//!
//! One directory per container under the containers root, holding the
//! record (`config.json`) and, for detached containers, the log file.
//! The record is written once at launch and read by inspection tooling.

use std::path::{Path, PathBuf};

use minidock_common::constants::CONTAINER_CONFIG_NAME;
use minidock_common::error::{MinidockError, Result};
use minidock_common::types::ContainerStatus;
use serde::{Deserialize, Serialize};

/// Persisted record of a launched container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerInfo {
    /// Host pid of the container's init process.
    pub pid: u32,
    /// Container identifier.
    pub id: String,
    /// Human-readable name (defaults to the id).
    pub name: String,
    /// Whitespace-joined user command.
    pub command: String,
    /// RFC-3339 creation timestamp.
    pub created_time: String,
    /// Lifecycle status at record time.
    pub status: ContainerStatus,
}

/// Directory holding a single container's record and log.
#[must_use]
pub fn container_dir(containers_root: &Path, container_id: &str) -> PathBuf {
    containers_root.join(container_id)
}

/// Writes the container record, creating its directory.
///
/// # Errors
///
/// Returns an error if the directory or record file cannot be written.
pub fn record_container_info(containers_root: &Path, info: &ContainerInfo) -> Result<()> {
    let dir = container_dir(containers_root, &info.id);
    std::fs::create_dir_all(&dir).map_err(|e| MinidockError::Io {
        path: dir.clone(),
        source: e,
    })?;
    let path = dir.join(CONTAINER_CONFIG_NAME);
    let json = serde_json::to_string_pretty(info)?;
    std::fs::write(&path, json).map_err(|e| MinidockError::Io { path, source: e })?;
    tracing::debug!(id = %info.id, "container record written");
    Ok(())
}

/// Reads one container's record.
///
/// # Errors
///
/// Returns `NotFound` if no record exists, or an error if it cannot be
/// read or parsed.
pub fn read_container_info(containers_root: &Path, container_id: &str) -> Result<ContainerInfo> {
    let path = container_dir(containers_root, container_id).join(CONTAINER_CONFIG_NAME);
    if !path.exists() {
        return Err(MinidockError::NotFound {
            kind: "container",
            id: container_id.to_string(),
        });
    }
    let json = std::fs::read_to_string(&path).map_err(|e| MinidockError::Io { path, source: e })?;
    Ok(serde_json::from_str(&json)?)
}

/// Lists every readable container record.
///
/// Entries with a missing or unparsable record are skipped with a
/// warning so one corrupt directory cannot hide the rest.
///
/// # Errors
///
/// Returns an error only if the containers root itself cannot be read.
pub fn list_containers(containers_root: &Path) -> Result<Vec<ContainerInfo>> {
    if !containers_root.exists() {
        return Ok(Vec::new());
    }
    let entries = std::fs::read_dir(containers_root).map_err(|e| MinidockError::Io {
        path: containers_root.to_path_buf(),
        source: e,
    })?;

    let mut infos = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| MinidockError::Io {
            path: containers_root.to_path_buf(),
            source: e,
        })?;
        let id = entry.file_name().to_string_lossy().into_owned();
        match read_container_info(containers_root, &id) {
            Ok(info) => infos.push(info),
            Err(e) => tracing::warn!(id, error = %e, "skipping unreadable container record"),
        }
    }
    Ok(infos)
}

/// Removes a container's record directory (and any log file in it).
///
/// Absence is not an error.
///
/// # Errors
///
/// Returns an error if an existing directory cannot be removed.
pub fn remove_container_info(containers_root: &Path, container_id: &str) -> Result<()> {
    let dir = container_dir(containers_root, container_id);
    match std::fs::remove_dir_all(&dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(MinidockError::Io { path: dir, source: e }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: &str) -> ContainerInfo {
        ContainerInfo {
            pid: 4321,
            id: id.to_string(),
            name: "test".to_string(),
            command: "sh -c true".to_string(),
            created_time: "2026-01-01T00:00:00+00:00".to_string(),
            status: ContainerStatus::Running,
        }
    }

    #[test]
    fn record_and_read_roundtrip() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let info = sample("c1");

        record_container_info(tmp.path(), &info).expect("record");
        let loaded = read_container_info(tmp.path(), "c1").expect("read");
        assert_eq!(loaded, info);
    }

    #[test]
    fn missing_record_is_not_found() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let err = read_container_info(tmp.path(), "ghost").expect_err("must fail");
        assert!(matches!(err, MinidockError::NotFound { .. }));
    }

    #[test]
    fn list_skips_unreadable_entries() {
        let tmp = tempfile::tempdir().expect("tempdir");
        record_container_info(tmp.path(), &sample("c1")).expect("record");

        // A directory without a record must not break listing.
        std::fs::create_dir_all(tmp.path().join("broken")).expect("broken dir");

        let infos = list_containers(tmp.path()).expect("list");
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].id, "c1");
    }

    #[test]
    fn list_on_missing_root_is_empty() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let infos = list_containers(&tmp.path().join("nope")).expect("list");
        assert!(infos.is_empty());
    }

    #[test]
    fn remove_is_idempotent() {
        let tmp = tempfile::tempdir().expect("tempdir");
        record_container_info(tmp.path(), &sample("c1")).expect("record");

        remove_container_info(tmp.path(), "c1").expect("first remove");
        remove_container_info(tmp.path(), "c1").expect("second remove");
        assert!(read_container_info(tmp.path(), "c1").is_err());
    }

    #[test]
    fn record_serializes_original_field_names() {
        let json = serde_json::to_string(&sample("c1")).expect("serialize");
        assert!(json.contains("\"createdTime\""));
        assert!(json.contains("\"status\":\"running\""));
    }
}
