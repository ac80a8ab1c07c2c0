//! Init bootstrap role.
//!
//! Runs as the very first process inside the new namespaces, re-executed
//! from the launcher with cwd already pinned to the merged view. Reads
//! the user command from the inherited pipe, swaps the root filesystem to
//! the merged view, mounts fresh pseudo-filesystems, and execs the
//! command in place.

use std::ffi::CString;
use std::io::Read;
use std::os::fd::FromRawFd;
use std::path::Path;

use minidock_common::constants::INIT_PIPE_FD;
use minidock_common::error::{MinidockError, Result};
use nix::mount::{MntFlags, MsFlags, mount, umount2};

/// Reads the handed-off command and execs it inside the container.
///
/// Never returns on success; the process image is replaced by the user
/// command.
///
/// # Errors
///
/// Returns an error if the pipe yields no command, mount setup fails, or
/// the exec itself fails.
pub fn bootstrap() -> Result<()> {
    let argv = read_init_command()?;
    if argv.is_empty() {
        return Err(MinidockError::Config {
            message: "init received an empty command".into(),
        });
    }
    tracing::info!(command = %argv.join(" "), "bootstrapping container");

    setup_mounts()?;

    let program = CString::new(argv[0].clone()).map_err(|e| MinidockError::Config {
        message: format!("command contains NUL byte: {e}"),
    })?;
    let args = argv
        .iter()
        .map(|arg| CString::new(arg.as_str()))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| MinidockError::Config {
            message: format!("argument contains NUL byte: {e}"),
        })?;

    // execvp resolves argv[0] against PATH inside the container and only
    // returns on failure.
    nix::unistd::execvp(&program, &args).map_err(|e| MinidockError::Process {
        message: format!("exec of {} failed: {e}", argv[0]),
    })?;
    unreachable!("execvp returned without error")
}

/// Reads the whole command string from the inherited pipe descriptor.
///
/// Blocks until the launcher closes the write end; that close is the
/// end-of-input signal.
fn read_init_command() -> Result<Vec<String>> {
    // SAFETY: the launcher dup'd the pipe's read end onto INIT_PIPE_FD
    // before exec; this process owns it exclusively.
    let mut pipe = unsafe { std::fs::File::from_raw_fd(INIT_PIPE_FD) };
    let mut raw = String::new();
    let _ = pipe
        .read_to_string(&mut raw)
        .map_err(|e| MinidockError::Process {
            message: format!("reading init pipe failed: {e}"),
        })?;
    Ok(split_command(&raw))
}

/// Whitespace-only splitting; quoting is intentionally not supported.
fn split_command(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

/// Swaps the root to the merged view and mounts fresh `/proc` and `/dev`.
fn setup_mounts() -> Result<()> {
    let merged = std::env::current_dir().map_err(|e| MinidockError::Process {
        message: format!("resolving working directory failed: {e}"),
    })?;

    // Keep mount events out of the host: systemd mounts / shared, and
    // pivot_root refuses shared propagation.
    mount(
        None::<&str>,
        "/",
        None::<&str>,
        MsFlags::MS_PRIVATE | MsFlags::MS_REC,
        None::<&str>,
    )
    .map_err(|e| MinidockError::Mount {
        message: format!("remounting / private failed: {e}"),
    })?;

    pivot_into(&merged)?;

    if let Err(e) = std::fs::create_dir_all("/proc") {
        tracing::warn!(error = %e, "mkdir /proc failed");
    }
    mount(
        Some("proc"),
        "/proc",
        Some("proc"),
        MsFlags::MS_NOEXEC | MsFlags::MS_NOSUID | MsFlags::MS_NODEV,
        None::<&str>,
    )
    .map_err(|e| MinidockError::Mount {
        message: format!("mounting /proc failed: {e}"),
    })?;

    if let Err(e) = std::fs::create_dir_all("/dev") {
        tracing::warn!(error = %e, "mkdir /dev failed");
    }
    mount(
        Some("tmpfs"),
        "/dev",
        Some("tmpfs"),
        MsFlags::MS_NOSUID | MsFlags::MS_STRICTATIME,
        Some("mode=755"),
    )
    .map_err(|e| MinidockError::Mount {
        message: format!("mounting /dev failed: {e}"),
    })?;

    Ok(())
}

/// Makes `new_root` the process root via `pivot_root(2)`, detaching and
/// removing the old root.
fn pivot_into(new_root: &Path) -> Result<()> {
    // pivot_root requires the new root to be a mount point; binding it
    // onto itself satisfies that for the overlay's merged directory.
    mount(
        Some(new_root),
        new_root,
        None::<&str>,
        MsFlags::MS_BIND | MsFlags::MS_REC,
        None::<&str>,
    )
    .map_err(|e| MinidockError::Mount {
        message: format!("self-bind of {} failed: {e}", new_root.display()),
    })?;

    let put_old = new_root.join(".pivot_root");
    std::fs::create_dir_all(&put_old).map_err(|e| MinidockError::Io {
        path: put_old.clone(),
        source: e,
    })?;

    nix::unistd::pivot_root(new_root, &put_old).map_err(|e| MinidockError::Mount {
        message: format!("pivot_root into {} failed: {e}", new_root.display()),
    })?;

    nix::unistd::chdir("/").map_err(|e| MinidockError::Process {
        message: format!("chdir to new root failed: {e}"),
    })?;

    let old_root = Path::new("/.pivot_root");
    umount2(old_root, MntFlags::MNT_DETACH).map_err(|e| MinidockError::Mount {
        message: format!("detaching old root failed: {e}"),
    })?;
    if let Err(e) = std::fs::remove_dir_all(old_root) {
        tracing::warn!(error = %e, "removing old root mount point failed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_splits_on_any_whitespace() {
        assert_eq!(
            split_command("sh -c  \"echo hi\"\n"),
            vec!["sh", "-c", "\"echo", "hi\""],
            "splitting is whitespace-only, with no quoting support"
        );
    }

    #[test]
    fn empty_pipe_content_yields_no_argv() {
        assert!(split_command("").is_empty());
        assert!(split_command("   \n\t").is_empty());
    }
}
