//! `minidock init`: bootstrap role inside the new namespaces.
//!
//! Never invoked by users directly; the launcher re-executes the binary
//! with this subcommand as the container's first process.

use clap::Args;

/// Arguments for the hidden `init` command (none).
#[derive(Args, Debug)]
pub struct InitArgs {}

/// Executes the init bootstrap.
///
/// # Errors
///
/// Returns an error if the command handoff or exec fails; on success
/// this call never returns.
pub fn execute(_args: &InitArgs) -> anyhow::Result<()> {
    minidock_runtime::init::bootstrap().map_err(|e| anyhow::anyhow!("{e}"))
}
