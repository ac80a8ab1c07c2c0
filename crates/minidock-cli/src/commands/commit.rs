//! `minidock commit`: package the merged view into an image archive.

use clap::Args;
use minidock_common::config::RuntimeConfig;
use minidock_core::filesystem::Workspace;

/// Arguments for the `commit` command.
#[derive(Args, Debug)]
pub struct CommitArgs {
    /// Name of the image archive to produce.
    pub image: String,
}

/// Executes the `commit` command.
///
/// Consumes the workspace's merged directory path only; the container's
/// isolation state is untouched.
///
/// # Errors
///
/// Returns an error if the merged tree cannot be packaged.
pub fn execute(args: &CommitArgs) -> anyhow::Result<()> {
    let config = RuntimeConfig::default();
    let workspace = Workspace::new(&config.workspace_root, None);
    let output = config.data_dir.join(format!("{}.tar.gz", args.image));

    minidock_core::image::pack_image(&workspace.merged(), &output)
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    println!("image written to {}", output.display());
    Ok(())
}
