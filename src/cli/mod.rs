//! Command-line interface for vbm
//!
//! Each subcommand lives in its own module as a clap `Args` struct with an
//! `execute()` method; this module defines the root [`Cli`] with the
//! global flags and dispatches. The CLI layer owns presentation and exit
//! status only - every argument's success or failure is reported
//! individually, and any failure maps the process exit to 1.
//!
//! ```bash
//! vbm get tpope/vim-fugitive kamichidu/vim-hariti
//! vbm enable ~/src/my-plugin --when "has('nvim')"
//! vbm list
//! vbm alias add vim-hariti hariti
//! vbm rm vim-hariti --force
//! vbm script -o ~/.vim/bundles.vim
//! ```

mod alias;
mod dependency;
mod disable;
mod enable;
mod get;
mod list;
mod remove;
mod script;

use crate::config::Config;
use crate::constants::{ENV_MAX_PARALLEL, ENV_ROOT};
use crate::core::CancelToken;
use crate::vcs::VcsRegistry;
use crate::workspace::Workspace;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI structure: global flags plus the subcommand.
#[derive(Parser)]
#[command(
    name = "vbm",
    about = "Vim Bundle Manager - manage Vim plugins with your VCS",
    version,
    author
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Managed root directory (checkouts, deploy links, metadata).
    #[arg(short = 'd', long, global = true, env = ENV_ROOT, value_name = "DIRECTORY")]
    root: Option<PathBuf>,

    /// Bound for concurrent fetches in batch get.
    #[arg(long, global = true, env = ENV_MAX_PARALLEL, value_name = "N")]
    max_parallel: Option<usize>,

    /// Enable debug output.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable progress spinners (automation-friendly).
    #[arg(long, global = true)]
    no_progress: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Fetch bundles and enable them (unless --disabled).
    Get(get::GetCommand),

    /// Enable bundles, optionally guarded by an activation expression.
    Enable(enable::EnableCommand),

    /// Disable bundles.
    Disable(disable::DisableCommand),

    /// Disable bundles and delete their checkouts.
    Rm(remove::RemoveCommand),

    /// Show every managed bundle, derived from the filesystem.
    List(list::ListCommand),

    /// Manage bundle aliases.
    Alias(alias::AliasCommand),

    /// Manage bundle dependencies.
    Dependency(dependency::DependencyCommand),

    /// Generate the Vim runtimepath script for the enabled set.
    Script(script::ScriptCommand),
}

impl Cli {
    /// Execute the parsed command against a workspace built from the
    /// global flags.
    pub async fn execute(self, cancel: CancelToken) -> Result<()> {
        let Self {
            command,
            root,
            max_parallel,
            verbose,
            quiet,
            no_progress,
        } = self;

        init_tracing(verbose, quiet);

        let config = Config::resolve(root, max_parallel)?;
        let registry = VcsRegistry::with_defaults();
        let workspace = Workspace::new(config, registry);
        workspace.ensure_layout()?;

        match command {
            Commands::Get(cmd) => cmd.execute(&workspace, &cancel, no_progress).await,
            Commands::Enable(cmd) => cmd.execute(&workspace).await,
            Commands::Disable(cmd) => cmd.execute(&workspace).await,
            Commands::Rm(cmd) => cmd.execute(&workspace, &cancel).await,
            Commands::List(cmd) => cmd.execute(&workspace),
            Commands::Alias(cmd) => cmd.execute(&workspace).await,
            Commands::Dependency(cmd) => cmd.execute(&workspace).await,
            Commands::Script(cmd) => cmd.execute(&workspace, &cancel).await,
        }
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
