//! `vbm disable` - remove deploy links

use crate::workspace::Workspace;
use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;

/// Disable bundles by removing their deploy links. Disabling a bundle
/// that is not enabled is a no-op; anything unmanaged at the entry is
/// left alone and reported.
#[derive(Args)]
pub struct DisableCommand {
    /// Repository references to disable.
    #[arg(required = true, value_name = "REPOSITORY")]
    pub(crate) references: Vec<String>,
}

impl DisableCommand {
    pub async fn execute(self, workspace: &Workspace) -> Result<()> {
        let mut failed = 0usize;
        for reference in &self.references {
            if let Err(e) = workspace.disable(reference).await {
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
