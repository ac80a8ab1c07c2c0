//! CLI command definitions and dispatch.

pub mod commit;
pub mod init;
pub mod logs;
pub mod ps;
pub mod run;

use clap::{Parser, Subcommand};

/// minidock, a minimal container runtime.
#[derive(Parser, Debug)]
#[command(name = "minidock", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Launch a command in an isolated container.
    Run(run::RunArgs),
    /// Internal init role re-executed inside the new namespaces.
    #[command(hide = true)]
    Init(init::InitArgs),
    /// Package the current merged view into an image archive.
    Commit(commit::CommitArgs),
    /// List launched containers.
    Ps(ps::PsArgs),
    /// View a container's captured output.
    Logs(logs::LogsArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Run(args) => run::execute(args),
        Command::Init(args) => init::execute(&args),
        Command::Commit(args) => commit::execute(&args),
        Command::Ps(args) => ps::execute(&args),
        Command::Logs(args) => logs::execute(&args),
    }
}
