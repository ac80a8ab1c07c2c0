//! `minidock logs`: view a container's captured output.

use clap::Args;
use minidock_common::config::RuntimeConfig;

/// Arguments for the `logs` command.
#[derive(Args, Debug)]
pub struct LogsArgs {
    /// Container ID.
    pub container: String,
}

/// Executes the `logs` command.
///
/// # Errors
///
/// Returns an error if the log file exists but cannot be read.
pub fn execute(args: &LogsArgs) -> anyhow::Result<()> {
    let config = RuntimeConfig::default();
    let content =
        minidock_runtime::logs::read_container_log(&config.containers_dir(), &args.container)
            .map_err(|e| anyhow::anyhow!("{e}"))?;

    if content.is_empty() {
        println!("No logs available for container: {}", args.container);
    } else {
        print!("{content}");
    }

    Ok(())
}
