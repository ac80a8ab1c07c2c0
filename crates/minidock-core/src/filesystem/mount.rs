//! Mount syscall seam.
//!
//! The workspace drives all mount operations through the [`Mounter`]
//! trait so tests can substitute a recording implementation and assert
//! teardown ordering without touching the kernel.

use std::path::Path;

use minidock_common::error::{MinidockError, Result};

/// Mount operations the filesystem workspace depends on.
pub trait Mounter: Send + Sync {
    /// Mounts an overlay composed of `lower` (read-only), `upper`
    /// (writable), and `work` at `merged`.
    ///
    /// # Errors
    ///
    /// Returns a `Mount` error if the mount syscall fails.
    fn mount_overlay(&self, lower: &Path, upper: &Path, work: &Path, merged: &Path) -> Result<()>;

    /// Bind-mounts `source` onto `target`.
    ///
    /// # Errors
    ///
    /// Returns a `Mount` error if the mount syscall fails.
    fn bind_mount(&self, source: &Path, target: &Path) -> Result<()>;

    /// Unmounts the filesystem at `target` (lazy detach).
    ///
    /// # Errors
    ///
    /// Returns a `Mount` error if the unmount syscall fails.
    fn unmount(&self, target: &Path) -> Result<()>;
}

/// Production [`Mounter`] issuing real `mount(2)` / `umount2(2)` calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct SysMounter;

impl Mounter for SysMounter {
    fn mount_overlay(&self, lower: &Path, upper: &Path, work: &Path, merged: &Path) -> Result<()> {
        let opts = format!(
            "lowerdir={},upperdir={},workdir={}",
            lower.display(),
            upper.display(),
            work.display()
        );
        nix::mount::mount(
            Some("overlay"),
            merged,
            Some("overlay"),
            nix::mount::MsFlags::empty(),
            Some(opts.as_str()),
        )
        .map_err(|e| MinidockError::Mount {
            message: format!("overlay mount at {} failed: {e}", merged.display()),
        })?;
        tracing::info!(merged = %merged.display(), "overlayfs mounted");
        Ok(())
    }

    fn bind_mount(&self, source: &Path, target: &Path) -> Result<()> {
        nix::mount::mount(
            Some(source),
            target,
            None::<&str>,
            nix::mount::MsFlags::MS_BIND,
            None::<&str>,
        )
        .map_err(|e| MinidockError::Mount {
            message: format!(
                "bind mount {} -> {} failed: {e}",
                source.display(),
                target.display()
            ),
        })?;
        tracing::info!(source = %source.display(), target = %target.display(), "volume bound");
        Ok(())
    }

    fn unmount(&self, target: &Path) -> Result<()> {
        nix::mount::umount2(target, nix::mount::MntFlags::MNT_DETACH).map_err(|e| {
            MinidockError::Mount {
                message: format!("unmount of {} failed: {e}", target.display()),
            }
        })?;
        tracing::debug!(target = %target.display(), "unmounted");
        Ok(())
    }
}
