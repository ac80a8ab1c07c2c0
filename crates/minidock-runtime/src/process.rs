//! Isolated process construction.
//!
//! Builds the unstarted child process descriptor: namespace flags applied
//! between fork and exec, stdio wiring (interactive or log-file), the
//! command pipe inherited at a fixed descriptor slot, and the working
//! directory pinned to the workspace's merged view.

use std::os::fd::{AsRawFd, OwnedFd};
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Command, Stdio};

use minidock_common::constants::INIT_PIPE_FD;
use minidock_common::error::{MinidockError, Result};
use minidock_common::types::ContainerId;
use minidock_core::filesystem::Workspace;
use nix::sched::CloneFlags;

/// Builds the container's init process and the command pipe's write end.
///
/// The returned [`Command`] re-invokes the current executable with the
/// `init` role marker. Namespace isolation (UTS, PID, mount, network,
/// IPC) is requested in a `pre_exec` hook, so it wraps the child from the
/// first instruction it runs. The pipe's read end is dup'd onto
/// [`INIT_PIPE_FD`] in the same hook; the dup clears close-on-exec, so
/// exactly that one descriptor survives into the init process.
///
/// Building the workspace happens here as a side effect because the
/// child's working directory must point at the merged view before start.
///
/// # Errors
///
/// Pipe allocation, workspace build, and log-file creation failures abort
/// the launch before any process is started.
pub fn new_init_process(
    tty: bool,
    container_id: &ContainerId,
    workspace: &Workspace,
    image_tar: &Path,
    containers_dir: &Path,
) -> Result<(Command, OwnedFd)> {
    let (read_end, write_end) =
        nix::unistd::pipe2(nix::fcntl::OFlag::O_CLOEXEC).map_err(|e| MinidockError::Process {
            message: format!("command pipe allocation failed: {e}"),
        })?;

    workspace.build(image_tar)?;

    let mut cmd = Command::new("/proc/self/exe");
    let _ = cmd.arg("init").current_dir(workspace.merged());

    let clone_flags = CloneFlags::CLONE_NEWUTS
        | CloneFlags::CLONE_NEWPID
        | CloneFlags::CLONE_NEWNS
        | CloneFlags::CLONE_NEWNET
        | CloneFlags::CLONE_NEWIPC;

    // SAFETY: the hook runs in the forked child before exec and only
    // issues async-signal-safe syscalls (unshare, dup2).
    unsafe {
        let _ = cmd.pre_exec(move || {
            nix::sched::unshare(clone_flags).map_err(std::io::Error::from)?;
            if libc::dup2(read_end.as_raw_fd(), INIT_PIPE_FD) < 0 {
                return Err(std::io::Error::last_os_error());
            }
            Ok(())
        });
    }

    if tty {
        let _ = cmd
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
    } else {
        let log_file = create_log_file(containers_dir, container_id)?;
        let log_clone = log_file.try_clone().map_err(|e| MinidockError::Process {
            message: format!("duplicating log handle failed: {e}"),
        })?;
        let _ = cmd.stdout(log_clone).stderr(log_file);
    }

    Ok((cmd, write_end))
}

/// Creates the detached container's log file, with parent directories.
fn create_log_file(containers_dir: &Path, container_id: &ContainerId) -> Result<std::fs::File> {
    let dir = crate::state::container_dir(containers_dir, container_id.as_str());
    std::fs::create_dir_all(&dir).map_err(|e| MinidockError::Io {
        path: dir.clone(),
        source: e,
    })?;
    let path = crate::logs::log_path(containers_dir, container_id.as_str());
    std::fs::File::create(&path).map_err(|e| MinidockError::Io { path, source: e })
}
