//! Git backend
//!
//! Implements the backend capability set on top of the system git command,
//! the same way Cargo shells out rather than linking a git library:
//!
//! - capability probe: `git ls-remote <url>` (read-only, success exit
//!   means the origin is served);
//! - clone: `git clone --recursive <url> <local_path>`;
//! - update: `git pull --ff --ff-only` run inside the checkout, so a
//!   non-fast-forward origin fails instead of merging;
//! - modification check: `git diff --quiet` inside the checkout.

use crate::bundle::RemoteBundle;
use crate::core::{CancelToken, VbmError};
use crate::vcs::{VcsBackend, command::VcsCommand};
use anyhow::Result;
use async_trait::async_trait;
use url::Url;

/// Platform-appropriate git executable name.
pub const fn git_command() -> &'static str {
    if cfg!(windows) { "git.exe" } else { "git" }
}

/// Backend for git origins.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitBackend;

impl GitBackend {
    /// Create the backend. Git presence is checked lazily at first use.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn program(&self) -> Result<String> {
        which::which(git_command())
            .map(|_| git_command().to_string())
            .map_err(|_| {
                VbmError::BackendExecution {
                    tool: git_command().to_string(),
                    operation: "locate".to_string(),
                    stderr: "git is not installed or not on PATH".to_string(),
                }
                .into()
            })
    }
}

#[async_trait]
impl VcsBackend for GitBackend {
    fn name(&self) -> &'static str {
        "git"
    }

    async fn can_handle(&self, cancel: &CancelToken, url: &Url) -> Result<bool> {
        let git = self.program()?;
        VcsCommand::new(git)
            .args(["ls-remote", url.as_str()])
            .probe(cancel)
            .await
    }

    async fn clone_repo(
        &self,
        cancel: &CancelToken,
        bundle: &RemoteBundle,
        update: bool,
    ) -> Result<()> {
        let git = self.program()?;
        let path = &bundle.local_path;
        match std::fs::metadata(path) {
            Err(_) => {
                tracing::info!(target: "vcs", "cloning {} into {}", bundle.url, path.display());
                VcsCommand::new(git)
                    .args(["clone", "--recursive"])
                    .arg(bundle.url.as_str())
                    .arg(path.display().to_string())
                    .label(&bundle.name)
                    .run(cancel)
                    .await?;
                Ok(())
            }
            Ok(meta) if meta.is_dir() && update => {
                tracing::info!(target: "vcs", "updating {}", path.display());
                VcsCommand::new(git)
                    .args(["pull", "--ff", "--ff-only"])
                    .current_dir(path)
                    .label(&bundle.name)
                    .run(cancel)
                    .await?;
                Ok(())
            }
            // Checkout already present and no update requested.
            Ok(_) => Ok(()),
        }
    }

    async fn is_modified(&self, cancel: &CancelToken, bundle: &RemoteBundle) -> Result<bool> {
        let git = self.program()?;
        let path = &bundle.local_path;
        match std::fs::metadata(path) {
            Err(_) => Err(VbmError::NotCloned { path: path.clone() }.into()),
            Ok(meta) if !meta.is_dir() => Err(VbmError::Layout {
                path: path.clone(),
                reason: "checkout is not a directory".to_string(),
            }
            .into()),
            Ok(_) => {
                let clean = VcsCommand::new(git)
                    .args(["diff", "--quiet"])
                    .current_dir(path)
                    .label(&bundle.name)
                    .probe(cancel)
                    .await?;
                Ok(!clean)
            }
        }
    }
}
