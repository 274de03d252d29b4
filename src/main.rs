//! vbm CLI entry point
//!
//! Parses arguments, wires Ctrl-C to the cancellation token every backend
//! operation races against, executes the command and maps any failure to
//! exit status 1.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use vbm_cli::cli::Cli;
use vbm_cli::core::CancelToken;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    // Ctrl-C cancels in-flight backend subprocesses instead of orphaning
    // them.
    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });
    }

    match cli.execute(cancel).await {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            std::process::exit(1);
        }
    }
}
