//! `vbm alias` - alias management

use crate::workspace::Workspace;
use anyhow::Result;
use clap::{Args, Subcommand};

/// Manage the alias list stored in a bundle's metadata overlay.
#[derive(Args)]
pub struct AliasCommand {
    #[command(subcommand)]
    pub(crate) command: AliasSubcommand,
}

#[derive(Subcommand)]
pub(crate) enum AliasSubcommand {
    /// Add aliases to a bundle.
    #[command(visible_alias = "a")]
    Add {
        /// The bundle the aliases attach to.
        #[arg(value_name = "REPOSITORY")]
        reference: String,
        /// Aliases to add.
        #[arg(required = true, value_name = "ALIAS")]
        aliases: Vec<String>,
    },

    /// Remove aliases from a bundle.
    #[command(visible_alias = "d")]
    Rm {
        /// The bundle the aliases are removed from.
        #[arg(value_name = "REPOSITORY")]
        reference: String,
        /// Aliases to remove.
        #[arg(required = true, value_name = "ALIAS")]
        aliases: Vec<String>,
    },

    /// Clear a bundle's alias list.
    #[command(visible_alias = "c")]
    Clear {
        /// The bundle whose aliases are cleared.
        #[arg(value_name = "REPOSITORY")]
        reference: String,
    },
}

impl AliasCommand {
    pub async fn execute(self, workspace: &Workspace) -> Result<()> {
        match self.command {
            AliasSubcommand::Add { reference, aliases } => {
                for alias in &aliases {
                    workspace.add_alias(&reference, alias).await?;
                }
            }
            AliasSubcommand::Rm { reference, aliases } => {
                for alias in &aliases {
                    workspace.remove_alias(&reference, alias).await?;
                }
            }
            AliasSubcommand::Clear { reference } => {
                workspace.clear_aliases(&reference).await?;
            }
        }
        Ok(())
    }
}
