//! Host-directory volume specifications.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use minidock_common::error::MinidockError;

/// A parsed `host:container` volume pair.
///
/// Both sides must be non-empty and exactly one `:` separator is allowed;
/// anything else is rejected before any mount state is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeSpec {
    /// Directory on the host, created if absent.
    pub host_path: PathBuf,
    /// Path inside the container's root filesystem.
    pub container_path: PathBuf,
}

impl VolumeSpec {
    /// Resolves the volume's bind target under the merged view.
    ///
    /// The container path is treated as relative to the container root
    /// even when written absolute (`/data`), so it nests under `merged`
    /// rather than replacing it.
    #[must_use]
    pub fn target_under(&self, merged: &Path) -> PathBuf {
        match self.container_path.strip_prefix("/") {
            Ok(relative) => merged.join(relative),
            Err(_) => merged.join(&self.container_path),
        }
    }
}

impl FromStr for VolumeSpec {
    type Err = MinidockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [host, container] = parts.as_slice() else {
            return Err(MinidockError::Config {
                message: format!("invalid volume [{s}], must be <host>:<container>"),
            });
        };
        if host.is_empty() || container.is_empty() {
            return Err(MinidockError::Config {
                message: format!("invalid volume [{s}], paths cannot be empty"),
            });
        }
        Ok(Self {
            host_path: PathBuf::from(host),
            container_path: PathBuf::from(container),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_spec_parses() {
        let spec: VolumeSpec = "a:b".parse().expect("parse");
        assert_eq!(spec.host_path, PathBuf::from("a"));
        assert_eq!(spec.container_path, PathBuf::from("b"));
    }

    #[test]
    fn malformed_specs_are_rejected() {
        for raw in ["a", "a:b:c", ":b", "a:", ":"] {
            assert!(
                raw.parse::<VolumeSpec>().is_err(),
                "spec [{raw}] must be rejected"
            );
        }
    }

    #[test]
    fn absolute_container_path_nests_under_merged() {
        let spec: VolumeSpec = "/host/data:/data".parse().expect("parse");
        assert_eq!(
            spec.target_under(Path::new("/root/merged")),
            PathBuf::from("/root/merged/data")
        );
    }

    #[test]
    fn relative_container_path_nests_under_merged() {
        let spec: VolumeSpec = "/host/data:data".parse().expect("parse");
        assert_eq!(
            spec.target_under(Path::new("/root/merged")),
            PathBuf::from("/root/merged/data")
        );
    }
}
