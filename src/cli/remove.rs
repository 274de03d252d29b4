//! `vbm rm` - disable and delete checkouts

use crate::core::CancelToken;
use crate::workspace::Workspace;
use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;

/// Remove bundles: disable first, then delete the checkout directory.
/// A checkout with uncommitted changes blocks the removal unless
/// `--force`; local bundles are only disabled, their directories are
/// never deleted.
#[derive(Args)]
pub struct RemoveCommand {
    /// Repository references to remove.
    #[arg(required = true, value_name = "REPOSITORY")]
    pub(crate) references: Vec<String>,

    /// Delete even when the checkout has uncommitted changes.
    #[arg(short, long)]
    pub(crate) force: bool,
}

impl RemoveCommand {
    pub async fn execute(self, workspace: &Workspace, cancel: &CancelToken) -> Result<()> {
        let mut failed = 0usize;
        for reference in &self.references {
            if let Err(e) = workspace.remove(cancel, reference, self.force).await {
                failed += 1;
                eprintln!("{} {reference}: {e:#}", "failed".red());
            }
        }
        if failed > 0 {
            bail!("{failed} of {} bundle(s) failed", self.references.len());
        }
        Ok(())
    }
}
