//! `minidock ps`: list launched containers.

use clap::Args;
use minidock_common::config::RuntimeConfig;

/// Arguments for the `ps` command.
#[derive(Args, Debug)]
pub struct PsArgs {}

/// Executes the `ps` command.
///
/// Reads every container record under the containers directory and
/// prints them in a tabular format.
///
/// # Errors
///
/// Returns an error if the containers directory cannot be read.
pub fn execute(_args: &PsArgs) -> anyhow::Result<()> {
    let config = RuntimeConfig::default();
    let containers = minidock_runtime::state::list_containers(&config.containers_dir())
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    if containers.is_empty() {
        println!("No containers found.");
        return Ok(());
    }

    println!(
        "{:<14} {:<15} {:<8} {:<9} {:<25} {:<25}",
        "CONTAINER ID", "NAME", "PID", "STATUS", "COMMAND", "CREATED"
    );
    for c in &containers {
        println!(
            "{:<14} {:<15} {:<8} {:<9} {:<25} {:<25}",
            c.id, c.name, c.pid, c.status, c.command, c.created_time
        );
    }

    Ok(())
}
