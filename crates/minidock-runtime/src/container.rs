//! Run orchestration.
//!
//! Sequences a single container lifecycle: workspace + process
//! construction, start, cgroup limiting, command handoff over the pipe,
//! wait, and ordered teardown. Steps after a successful start never
//! abort early; failures are logged and the cleanup tail always runs.

use std::io::Write;
use std::os::fd::OwnedFd;

use minidock_common::config::RuntimeConfig;
use minidock_common::constants::CGROUP_MANAGER_NAME;
use minidock_common::error::{MinidockError, Result};
use minidock_common::types::{ContainerId, ContainerStatus, ResourceConfig};
use minidock_core::cgroup::CgroupManager;
use minidock_core::filesystem::Workspace;

use crate::state::{self, ContainerInfo};

/// Launch parameters for one container.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Attach the container to the current terminal instead of a log file.
    pub tty: bool,
    /// Optional human-readable name; defaults to the container id.
    pub name: Option<String>,
    /// Optional `host:container` volume spec.
    pub volume: Option<String>,
    /// User command and its arguments.
    pub command: Vec<String>,
}

/// Runs a container to completion.
///
/// The cgroup is destroyed and the workspace torn down on every path
/// that gets past process start, regardless of the child's exit status.
///
/// # Errors
///
/// Returns an error only for failures before or at process start; once
/// the child is running, problems are logged and the run is carried to
/// its end.
pub fn run_container(
    opts: &RunOptions,
    res: &ResourceConfig,
    config: &RuntimeConfig,
) -> Result<()> {
    let container_id = ContainerId::generate();
    let containers_dir = config.containers_dir();
    let workspace = Workspace::new(&config.workspace_root, opts.volume.as_deref());

    let (mut cmd, write_pipe) = process_or_abort(opts, &container_id, &workspace, config)?;

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            tracing::error!(error = %e, "container process failed to start");
            workspace.teardown();
            return Err(MinidockError::Process {
                message: format!("starting init process failed: {e}"),
            });
        }
    };
    let pid = child.id();
    tracing::info!(id = %container_id, pid, "container started");

    let info = ContainerInfo {
        pid,
        id: container_id.to_string(),
        name: opts
            .name
            .clone()
            .unwrap_or_else(|| container_id.to_string()),
        command: opts.command.join(" "),
        created_time: chrono::Utc::now().to_rfc3339(),
        status: ContainerStatus::Running,
    };
    if let Err(e) = state::record_container_info(&containers_dir, &info) {
        tracing::warn!(error = %e, "container record not written");
    }

    // Limits go on between start and handoff so the workload cannot run
    // a single instruction unconstrained.
    let manager = CgroupManager::with_default_subsystems(CGROUP_MANAGER_NAME, container_id.as_str());
    if let Err(e) = manager.set(res) {
        tracing::warn!(error = %e, "not all resource limits were set");
    }
    if let Err(e) = manager.apply(pid, res) {
        tracing::warn!(error = %e, "not all cgroup attachments succeeded");
    }

    send_init_command(&opts.command, write_pipe);

    match child.wait() {
        Ok(status) if status.success() => {
            tracing::info!(id = %container_id, "container exited")
        }
        Ok(status) => tracing::info!(id = %container_id, %status, "container exited"),
        Err(e) => tracing::warn!(id = %container_id, error = %e, "wait failed"),
    }

    manager.destroy();
    workspace.teardown();

    // Interactive runs leave nothing behind; detached runs keep their
    // record and log file for ps/logs inspection.
    if opts.tty {
        if let Err(e) = state::remove_container_info(&containers_dir, container_id.as_str()) {
            tracing::warn!(error = %e, "container record not removed");
        }
    }
    Ok(())
}

/// Builds the init process, treating any failure as a hard abort: no
/// process was started, so no cgroup or record cleanup is owed.
fn process_or_abort(
    opts: &RunOptions,
    container_id: &ContainerId,
    workspace: &Workspace,
    config: &RuntimeConfig,
) -> Result<(std::process::Command, OwnedFd)> {
    crate::process::new_init_process(
        opts.tty,
        container_id,
        workspace,
        &config.image_tar,
        &config.containers_dir(),
    )
    .inspect_err(|e| tracing::error!(error = %e, "building init process failed"))
}

/// Hands the joined command over the pipe.
///
/// Dropping the write end closes it; that close is the end-of-input
/// signal the init process waits for, so the handoff is exactly one
/// write followed by one close.
fn send_init_command(argv: &[String], write_pipe: OwnedFd) {
    let command = argv.join(" ");
    tracing::info!(command = %command, "sending command to init");
    let mut pipe = std::fs::File::from(write_pipe);
    if let Err(e) = pipe.write_all(command.as_bytes()) {
        tracing::error!(error = %e, "writing command to init pipe failed");
    }
}
