//! `vbm dependency` - dependency management

use crate::workspace::Workspace;
use anyhow::Result;
use clap::{Args, Subcommand};

/// Manage the dependency list stored in a bundle's metadata overlay.
/// Dependencies are recorded by canonical URL and resolved recursively
/// whenever the bundle is rebuilt.
#[derive(Args)]
pub struct DependencyCommand {
    #[command(subcommand)]
    pub(crate) command: DependencySubcommand,
}

#[derive(Subcommand)]
pub(crate) enum DependencySubcommand {
    /// Add dependencies to a bundle. A dependency that would close a
    /// cycle is refused.
    #[command(visible_alias = "a")]
    Add {
        /// The bundle gaining dependencies.
        #[arg(value_name = "REPOSITORY")]
        reference: String,
        /// References of the dependencies.
        #[arg(required = true, value_name = "DEPENDENCY")]
        dependencies: Vec<String>,
    },

    /// Remove dependencies from a bundle.
    #[command(visible_alias = "d")]
    Rm {
        /// The bundle losing dependencies.
        #[arg(value_name = "REPOSITORY")]
        reference: String,
        /// References of the dependencies.
        #[arg(required = true, value_name = "DEPENDENCY")]
        dependencies: Vec<String>,
    },

    /// Clear a bundle's dependency list.
    #[command(visible_alias = "c")]
    Clear {
        /// The bundle whose dependencies are cleared.
        #[arg(value_name = "REPOSITORY")]
        reference: String,
    },
}

impl DependencyCommand {
    pub async fn execute(self, workspace: &Workspace) -> Result<()> {
        match self.command {
            DependencySubcommand::Add {
                reference,
                dependencies,
            } => {
                for dependency in &dependencies {
                    workspace.add_dependency(&reference, dependency).await?;
                }
            }
            DependencySubcommand::Rm {
                reference,
                dependencies,
            } => {
                for dependency in &dependencies {
                    workspace.remove_dependency(&reference, dependency).await?;
                }
            }
            DependencySubcommand::Clear { reference } => {
                workspace.clear_dependencies(&reference).await?;
            }
        }
        Ok(())
    }
}
