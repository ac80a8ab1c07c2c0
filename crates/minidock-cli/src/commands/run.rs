//! `minidock run`: launch a command in an isolated container.

use clap::Args;
use minidock_common::config::RuntimeConfig;
use minidock_common::types::ResourceConfig;
use minidock_runtime::container::{RunOptions, run_container};

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Attach the container to the current terminal.
    #[arg(short = 't', long = "tty")]
    pub tty: bool,

    /// Memory limit as a kernel byte quantity (e.g. "100m").
    #[arg(short = 'm', long = "memory")]
    pub memory: Option<String>,

    /// Relative CPU weight.
    #[arg(long = "cpu-shares")]
    pub cpu_shares: Option<String>,

    /// CPU cores the container may run on (e.g. "0-1").
    #[arg(long = "cpuset-cpus")]
    pub cpuset_cpus: Option<String>,

    /// Bind a host directory into the container (<host>:<container>).
    #[arg(short = 'v', long = "volume")]
    pub volume: Option<String>,

    /// Human-readable container name.
    #[arg(long)]
    pub name: Option<String>,

    /// Command to execute inside the container.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
    pub command: Vec<String>,
}

/// Executes the `run` command.
///
/// # Errors
///
/// Returns an error if the container fails before or at process start.
pub fn execute(args: RunArgs) -> anyhow::Result<()> {
    let res = ResourceConfig {
        memory_limit: args.memory.filter(|v| !v.is_empty()),
        cpu_shares: args.cpu_shares.filter(|v| !v.is_empty()),
        cpuset_cpus: args.cpuset_cpus.filter(|v| !v.is_empty()),
    };
    let opts = RunOptions {
        tty: args.tty,
        name: args.name,
        volume: args.volume,
        command: args.command,
    };

    run_container(&opts, &res, &RuntimeConfig::default()).map_err(|e| anyhow::anyhow!("{e}"))
}
