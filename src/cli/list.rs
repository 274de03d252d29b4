//! `vbm list` - show the managed inventory

use crate::bundle::Bundle;
use crate::workspace::Workspace;
use anyhow::Result;
use clap::Args;

/// List every managed bundle. Nothing is read from a registry: remote
/// bundles are rebuilt from the repositories directory names, local
/// bundles from deploy links pointing outside the managed tree.
#[derive(Args)]
pub struct ListCommand {}

impl ListCommand {
    pub fn execute(self, workspace: &Workspace) -> Result<()> {
        let bundles = workspace.list()?;

        let mut rows: Vec<[String; 5]> = vec![[
            "Kind".to_string(),
            "Name".to_string(),
            "URL/Path".to_string(),
            "Aliases".to_string(),
            "Enabled".to_string(),
        ]];
        for bundle in &bundles {
            let enabled = if workspace.is_enabled(bundle) { "yes" } else { "" };
            let row = match bundle {
                Bundle::Remote(remote) => [
                    "Remote".to_string(),
                    remote.name.clone(),
                    remote.url.to_string(),
                    remote.aliases.join(","),
                    enabled.to_string(),
                ],
                Bundle::Local(local) => [
                    "Local".to_string(),
                    local.name.clone(),
                    local.local_path.display().to_string(),
                    local.aliases.join(","),
                    enabled.to_string(),
                ],
            };
            rows.push(row);
        }

        let mut widths = [0usize; 5];
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }
        for row in &rows {
            let line = row
                .iter()
                .zip(widths)
                .map(|(cell, width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join("   ");
            println!("{}", line.trim_end());
        }
        Ok(())
    }
}
