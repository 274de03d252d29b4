//! `vbm get` - fetch bundles concurrently

use crate::core::CancelToken;
use crate::workspace::Workspace;
use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Fetch one or more bundles. Remote references are cloned (or
/// fast-forwarded with `--update`) through the selected backend; local
/// references skip the fetch. Each reference runs as its own worker and
/// fails on its own; the command exits nonzero if any reference failed.
#[derive(Args)]
pub struct GetCommand {
    /// Repository references: URL, owner/name, bare name, or local path.
    #[arg(required = true, value_name = "REPOSITORY")]
    pub(crate) references: Vec<String>,

    /// Fast-forward existing checkouts instead of leaving them untouched.
    #[arg(short, long)]
    pub(crate) update: bool,

    /// Fetch only; do not enable afterwards.
    #[arg(long)]
    pub(crate) disabled: bool,
}

impl GetCommand {
    pub async fn execute(
        self,
        workspace: &Workspace,
        cancel: &CancelToken,
        no_progress: bool,
    ) -> Result<()> {
        let spinner = if no_progress {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.set_message(format!("fetching {} bundle(s)", self.references.len()));
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        };

        let outcomes = workspace
            .get_many(cancel, &self.references, self.update, !self.disabled)
            .await;
        spinner.finish_and_clear();

        let mut failed = 0usize;
        for outcome in &outcomes {
            match &outcome.result {
                Ok(()) => println!("{} {}", "ok".green(), outcome.reference),
                Err(e) => {
                    failed += 1;
                    eprintln!("{} {}: {:#}", "failed".red(), outcome.reference, e);
                }
            }
        }
        if failed > 0 {
            bail!("{failed} of {} bundle(s) failed", outcomes.len());
        }
        Ok(())
    }
}
