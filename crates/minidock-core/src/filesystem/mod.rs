//! Container root filesystem workspaces.
//!
//! A workspace layers a shared read-only lower directory (extracted once
//! from the base image archive), a per-container writable upper layer, and
//! an overlay `merged` view, with an optional host-directory volume bound
//! inside the merged tree.
//!
//! Build and teardown run in a strict order: the merged view must be
//! mounted before anything uses it, and the volume bind must be unmounted
//! before the overlay; the bind target lives inside the merged view, so
//! unmounting the overlay first would orphan the bind and risk losing
//! writable-layer state.

pub mod mount;
pub mod volume;

use std::path::{Path, PathBuf};

use minidock_common::error::{MinidockError, Result};

pub use mount::{Mounter, SysMounter};
pub use volume::VolumeSpec;

/// A container's root filesystem workspace.
pub struct Workspace {
    root: PathBuf,
    volume: Option<VolumeSpec>,
    mounter: Box<dyn Mounter>,
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("root", &self.root)
            .field("volume", &self.volume)
            .finish_non_exhaustive()
    }
}

impl Workspace {
    /// Creates a workspace rooted at `root` using the system mounter.
    ///
    /// A malformed volume spec is logged and dropped: the container
    /// proceeds without the volume and no partial mount state is created.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, volume: Option<&str>) -> Self {
        Self::with_mounter(root, volume, Box::new(SysMounter))
    }

    /// Creates a workspace driving mounts through a custom [`Mounter`].
    #[must_use]
    pub fn with_mounter(
        root: impl Into<PathBuf>,
        volume: Option<&str>,
        mounter: Box<dyn Mounter>,
    ) -> Self {
        let volume = volume.and_then(|raw| match raw.parse::<VolumeSpec>() {
            Ok(spec) => Some(spec),
            Err(e) => {
                tracing::error!(volume = raw, error = %e, "volume spec rejected");
                None
            }
        });
        Self {
            root: root.into(),
            volume,
            mounter,
        }
    }

    /// Read-only base layer, shared across launches.
    #[must_use]
    pub fn lower(&self) -> PathBuf {
        self.root.join("lower")
    }

    /// Per-container writable layer.
    #[must_use]
    pub fn upper(&self) -> PathBuf {
        self.root.join("upper")
    }

    /// Overlay work directory.
    #[must_use]
    pub fn work(&self) -> PathBuf {
        self.root.join("work")
    }

    /// The union view the container runs in.
    #[must_use]
    pub fn merged(&self) -> PathBuf {
        self.root.join("merged")
    }

    /// The volume spec this workspace will bind, if any survived parsing.
    #[must_use]
    pub fn volume(&self) -> Option<&VolumeSpec> {
        self.volume.as_ref()
    }

    /// Builds the workspace: lower extraction, layer directories, overlay
    /// mount, and the optional volume bind.
    ///
    /// # Errors
    ///
    /// Lower-layer extraction and the overlay mount are fatal; a failed
    /// volume bind only degrades the workspace (logged, container still
    /// usable).
    pub fn build(&self, image_tar: &Path) -> Result<()> {
        self.create_lower(image_tar)?;
        self.create_dirs();
        self.mounter
            .mount_overlay(&self.lower(), &self.upper(), &self.work(), &self.merged())?;

        if let Some(spec) = &self.volume {
            if let Err(e) = self.mount_volume(spec) {
                tracing::error!(error = %e, "volume mount failed, continuing without it");
            }
        }
        Ok(())
    }

    /// Extracts the base image into the lower directory on first use.
    ///
    /// Idempotent: an existing lower layer is reused untouched, so
    /// concurrent launches share one extraction.
    fn create_lower(&self, image_tar: &Path) -> Result<()> {
        let lower = self.lower();
        if lower.exists() {
            tracing::debug!(lower = %lower.display(), "lower layer already present");
            return Ok(());
        }
        std::fs::create_dir_all(&lower).map_err(|e| MinidockError::Io {
            path: lower.clone(),
            source: e,
        })?;
        crate::image::extract_image(image_tar, &lower)?;
        Ok(())
    }

    /// Creates the per-container upper, work, and merged directories.
    ///
    /// Failures are logged, not fatal: leftovers from a previous
    /// ungraceful teardown must not block a new launch.
    fn create_dirs(&self) {
        for dir in [self.upper(), self.work(), self.merged()] {
            if let Err(e) = std::fs::create_dir(&dir) {
                tracing::warn!(dir = %dir.display(), error = %e, "mkdir failed");
            }
        }
    }

    fn mount_volume(&self, spec: &VolumeSpec) -> Result<()> {
        if let Err(e) = std::fs::create_dir_all(&spec.host_path) {
            tracing::warn!(host = %spec.host_path.display(), error = %e, "host dir mkdir failed");
        }
        let target = spec.target_under(&self.merged());
        if let Err(e) = std::fs::create_dir_all(&target) {
            tracing::warn!(target = %target.display(), error = %e, "target mkdir failed");
        }
        self.mounter.bind_mount(&spec.host_path, &target)
    }

    /// Tears the workspace down: volume bind unmount first, then the
    /// overlay, then removal of the per-container directories.
    ///
    /// Best-effort and idempotent: every failure is logged and the
    /// remaining steps still run, so re-running against an already
    /// torn-down workspace is a harmless no-op. The lower layer is
    /// always preserved.
    pub fn teardown(&self) {
        if let Some(spec) = &self.volume {
            let target = spec.target_under(&self.merged());
            if let Err(e) = self.mounter.unmount(&target) {
                tracing::warn!(target = %target.display(), error = %e, "volume unmount failed");
            }
        }

        if let Err(e) = self.mounter.unmount(&self.merged()) {
            tracing::warn!(merged = %self.merged().display(), error = %e, "overlay unmount failed");
        }

        for dir in [self.merged(), self.upper(), self.work()] {
            match std::fs::remove_dir_all(&dir) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!(dir = %dir.display(), error = %e, "remove failed"),
            }
        }
    }
}
