//! Cancellable external tool execution
//!
//! Every backend capability runs exactly one external tool invocation, and
//! every invocation follows the same race discipline: the child's
//! completion races the caller-supplied [`CancelToken`]; if cancellation
//! fires first the child is killed and the operation reports
//! [`VbmError::Cancelled`], otherwise the child's own exit status decides.
//!
//! [`VcsCommand`] is a small fluent builder over [`tokio::process::Command`]
//! that centralizes that discipline plus output capture, command-line debug
//! logging and slow-command timing, so individual backends stay declarative.
//!
//! ```rust,ignore
//! let out = VcsCommand::new("git")
//!     .args(["ls-remote", "https://github.com/tpope/vim-fugitive"])
//!     .label("vim-fugitive")
//!     .run(&cancel)
//!     .await?;
//! ```

use crate::core::{CancelToken, VbmError};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Builder for one external tool invocation raced against cancellation.
pub struct VcsCommand {
    /// Program to spawn (e.g. "git", "vim")
    program: String,

    /// Arguments in order
    args: Vec<String>,

    /// Working directory for the child (defaults to the process directory)
    current_dir: Option<PathBuf>,

    /// Extra environment variables for the child
    env_vars: Vec<(String, String)>,

    /// Optional label included in log lines, typically the bundle name,
    /// to tell concurrent operations apart
    label: Option<String>,
}

impl VcsCommand {
    /// Start building an invocation of `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            env_vars: Vec::new(),
            label: None,
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run the child in `dir` instead of the process working directory.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Set an environment variable for the child only.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    /// Tag log lines with a label, typically the bundle name.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Execute and require a zero exit status.
    ///
    /// # Errors
    ///
    /// [`VbmError::Cancelled`] if the signal fired first (the child has
    /// been killed), [`VbmError::BackendExecution`] on spawn failure or a
    /// nonzero exit (carrying captured stderr).
    pub async fn run(self, cancel: &CancelToken) -> Result<VcsOutput> {
        let (output, tool, operation) = self.spawn_and_wait(cancel).await?;
        if output.status.success() {
            Ok(VcsOutput {
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            })
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            tracing::debug!(
                target: "vcs",
                "{tool} {operation} exited with {:?}",
                output.status.code()
            );
            Err(VbmError::BackendExecution {
                tool,
                operation,
                stderr: if stderr.trim().is_empty() {
                    stdout.trim().to_string()
                } else {
                    stderr.trim().to_string()
                },
            }
            .into())
        }
    }

    /// Execute and report whether the exit status was zero, for capability
    /// probes where a nonzero exit is an answer rather than a failure.
    ///
    /// Spawn failures and cancellation still surface as errors.
    pub async fn probe(self, cancel: &CancelToken) -> Result<bool> {
        let (output, ..) = self.spawn_and_wait(cancel).await?;
        Ok(output.status.success())
    }

    async fn spawn_and_wait(
        self,
        cancel: &CancelToken,
    ) -> Result<(std::process::Output, String, String)> {
        let operation = self.args.first().cloned().unwrap_or_default();
        let tool = self.program.clone();

        // A signal that already fired never spawns anything.
        if cancel.is_cancelled() {
            return Err(VbmError::Cancelled.into());
        }

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
        }
        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        if let Some(ref label) = self.label {
            tracing::debug!(target: "vcs", "({label}) executing: {tool} {}", self.args.join(" "));
        } else {
            tracing::debug!(target: "vcs", "executing: {tool} {}", self.args.join(" "));
        }

        let start = std::time::Instant::now();
        let child = cmd.spawn().map_err(|e| VbmError::BackendExecution {
            tool: tool.clone(),
            operation: operation.clone(),
            stderr: format!("failed to spawn {tool}: {e}"),
        })?;

        // The one suspension point that observes cancellation: losing the
        // race drops the wait future, and kill_on_drop reaps the child.
        let output = tokio::select! {
            output = child.wait_with_output() => {
                output.with_context(|| format!("failed to collect {tool} {operation} output"))?
            }
            () = cancel.cancelled() => {
                tracing::debug!(target: "vcs", "{tool} {operation} killed by cancellation");
                return Err(VbmError::Cancelled.into());
            }
        };

        let elapsed = start.elapsed();
        if elapsed.as_secs() >= 1 {
            tracing::info!(
                target: "vcs::perf",
                "{tool} {operation} took {:.2}s",
                elapsed.as_secs_f64()
            );
        } else if elapsed.as_millis() > 100 {
            tracing::debug!(
                target: "vcs::perf",
                "{tool} {operation} took {}ms",
                elapsed.as_millis()
            );
        }

        Ok((output, tool, operation))
    }
}

/// Captured output of a successful invocation.
#[derive(Debug)]
pub struct VcsOutput {
    /// Standard output, lossily decoded
    pub stdout: String,
    /// Standard error, lossily decoded
    pub stderr: String,
}
