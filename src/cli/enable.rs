//! `vbm enable` - materialize deploy links

use crate::workspace::Workspace;
use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;

/// Enable bundles by linking them into the deploy area. With `--when`,
/// the expression is stored in the bundle's metadata first and the
/// generated load script wraps the entry in an `if` guard.
#[derive(Args)]
pub struct EnableCommand {
    /// Repository references to enable.
    #[arg(required = true, value_name = "REPOSITORY")]
    pub(crate) references: Vec<String>,

    /// Vim expression gating activation, stored opaquely.
    #[arg(long, value_name = "EXPR")]
    pub(crate) when: Option<String>,
}

impl EnableCommand {
    pub async fn execute(self, workspace: &Workspace) -> Result<()> {
        let mut failed = 0usize;
        for reference in &self.references {
            let result = match &self.when {
                Some(expr) => workspace.enable_if(reference, expr).await,
                None => workspace.enable(reference).await,
            };
            if let Err(e) = result {
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
