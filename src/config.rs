//! Runtime configuration
//!
//! vbm keeps configuration deliberately small: the managed root directory
//! and the batch parallelism bound. There is no config file - the managed
//! filesystem is the source of truth - so [`Config`] is a plain value
//! built in `main` from flags and environment and passed down explicitly.
//!
//! Root precedence: `--root` flag, then `VBM_HOME`, then the platform
//! default (`~/.vbm` on Unix, the roaming config directory on Windows).

use crate::constants::DEFAULT_MAX_PARALLEL;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Resolved runtime settings for one invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Managed root directory, absolute.
    pub root: PathBuf,
    /// Concurrent worker bound for batch `get`.
    pub max_parallel: usize,
}

impl Config {
    /// Build a config from the CLI surface. `root` is the `--root` flag
    /// value (clap already folds `VBM_HOME` in); `max_parallel` comes from
    /// `--max-parallel` / `VBM_MAX_PARALLEL`.
    pub fn resolve(root: Option<PathBuf>, max_parallel: Option<usize>) -> Result<Self> {
        let root = match root {
            Some(root) => root,
            None => Self::default_root()?,
        };
        let root = std::path::absolute(&root)
            .with_context(|| format!("cannot absolutize managed root {}", root.display()))?;
        Ok(Self {
            root,
            max_parallel: max_parallel.unwrap_or(DEFAULT_MAX_PARALLEL).max(1),
        })
    }

    /// Platform default managed root.
    fn default_root() -> Result<PathBuf> {
        if cfg!(windows) {
            dirs::config_dir()
                .map(|dir| dir.join("vbm"))
                .context("cannot determine the configuration directory")
        } else {
            dirs::home_dir()
                .map(|dir| dir.join(".vbm"))
                .context("cannot determine the home directory")
        }
    }
}
