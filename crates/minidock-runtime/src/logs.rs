//! Container log files.

use std::path::{Path, PathBuf};

use minidock_common::error::{MinidockError, Result};

/// File name pattern for a container's captured output.
#[must_use]
pub fn log_file_name(container_id: &str) -> String {
    format!("{container_id}-json.log")
}

/// Full path of a container's log file under the containers root.
#[must_use]
pub fn log_path(containers_root: &Path, container_id: &str) -> PathBuf {
    crate::state::container_dir(containers_root, container_id).join(log_file_name(container_id))
}

/// Reads a container's captured output.
///
/// Returns an empty string if the container never logged (interactive
/// runs write to the terminal, not the log file).
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn read_container_log(containers_root: &Path, container_id: &str) -> Result<String> {
    let path = log_path(containers_root, container_id);
    if !path.exists() {
        return Ok(String::new());
    }
    std::fs::read_to_string(&path).map_err(|e| MinidockError::Io { path, source: e })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_path_follows_id_keyed_pattern() {
        let path = log_path(Path::new("/var/lib/minidock/containers"), "abc123");
        assert_eq!(
            path,
            PathBuf::from("/var/lib/minidock/containers/abc123/abc123-json.log")
        );
    }

    #[test]
    fn missing_log_reads_as_empty() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let content = read_container_log(tmp.path(), "ghost").expect("read");
        assert!(content.is_empty());
    }

    #[test]
    fn written_log_reads_back() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = crate::state::container_dir(tmp.path(), "c1");
        std::fs::create_dir_all(&dir).expect("dir");
        std::fs::write(log_path(tmp.path(), "c1"), "hello\n").expect("write");

        let content = read_container_log(tmp.path(), "c1").expect("read");
        assert_eq!(content, "hello\n");
    }
}
