//! `vbm script` - emit the Vim load script

use crate::core::CancelToken;
use crate::script::write_runtimepath_script;
use crate::workspace::Workspace;
use anyhow::{Context, Result};
use clap::Args;

/// Generate the runtimepath script Vim sources at startup: Vim's own
/// native directories first, then one entry per enabled bundle, guarded
/// by stored activation expressions.
#[derive(Args)]
pub struct ScriptCommand {
    /// Output file; "-" writes to stdout.
    #[arg(short, long, default_value = "-", value_name = "FILE")]
    pub(crate) output: String,

    /// Header line prepended verbatim (repeatable).
    #[arg(long, value_name = "LINE")]
    pub(crate) header: Vec<String>,
}

impl ScriptCommand {
    pub async fn execute(self, workspace: &Workspace, cancel: &CancelToken) -> Result<()> {
        let mut buffer = Vec::new();
        write_runtimepath_script(workspace, cancel, &mut buffer, &self.header).await?;

        if self.output == "-" {
            use std::io::Write;
            std::io::stdout()
                .write_all(&buffer)
                .context("failed to write script to stdout")?;
        } else {
            std::fs::write(&self.output, &buffer)
                .with_context(|| format!("failed to write script to {}", self.output))?;
        }
        Ok(())
    }
}
