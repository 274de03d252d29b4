//! Vim runtimepath script generation
//!
//! The collaborator that turns the enabled set into something Vim loads:
//! it queries Vim's own native runtimepath, appends one entry per deploy
//! link (in deploy-directory order), and guards entries whose bundle has a
//! stored activation expression. `after` directories - Vim's
//! load-last convention - are appended at the end, native ones included.
//!
//! This module only consumes engine queries ([`Workspace::deploy_dir`],
//! [`Workspace::enable_if_expr`]); it interprets nothing itself. The Vim
//! probe goes through the same cancellable runner as the VCS backends.

use crate::core::CancelToken;
use crate::vcs::VcsCommand;
use crate::workspace::Workspace;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;

/// Emit the full load script: caller-supplied header lines, a runtimepath
/// reset, then one guarded `set runtimepath+=` per directory.
pub async fn write_runtimepath_script(
    ws: &Workspace,
    cancel: &CancelToken,
    out: &mut dyn Write,
    headers: &[String],
) -> Result<()> {
    let (mut rtp, mut after_rtp) = native_runtime_dirs(cancel).await?;
    let (deploy, deploy_after) = deploy_runtime_dirs(ws)?;
    rtp.extend(deploy);
    after_rtp.extend(deploy_after);
    rtp.extend(after_rtp);

    render(out, headers, &rtp, |name| ws.enable_if_expr(name))
}

/// Ask Vim itself for its default runtimepath, split into regular and
/// `after` entries. Vim prints the answer on stderr in batch mode.
async fn native_runtime_dirs(cancel: &CancelToken) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let output = VcsCommand::new("vim")
        .args([
            "--not-a-term",
            "-N",
            "-n",
            "--noplugin",
            "-i",
            "NONE",
            "-u",
            "NONE",
            "-U",
            "NONE",
            "--cmd",
            "echo &runtimepath",
            "--cmd",
            "q!",
        ])
        .run(cancel)
        .await
        .context("failed to query vim's native runtimepath")?;

    let mut rtp = Vec::new();
    let mut after_rtp = Vec::new();
    for entry in output
        .stderr
        .trim()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        let path = PathBuf::from(entry);
        if path.file_name().is_some_and(|n| n == "after") {
            after_rtp.push(path);
        } else {
            rtp.push(path);
        }
    }
    Ok((rtp, after_rtp))
}

/// Deploy entries in directory order, plus their `after/` subdirectories.
fn deploy_runtime_dirs(ws: &Workspace) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let deploy_dir = ws.deploy_dir();
    let mut names: Vec<_> = std::fs::read_dir(&deploy_dir)
        .with_context(|| format!("failed to read {}", deploy_dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|entry| entry.file_name())
        .collect();
    names.sort();

    let mut dirs = Vec::new();
    let mut after = Vec::new();
    for name in names {
        let plugin_dir = deploy_dir.join(&name);
        let after_dir = plugin_dir.join("after");
        if after_dir.is_dir() {
            after.push(after_dir);
        }
        dirs.push(plugin_dir);
    }
    Ok((dirs, after))
}

/// Write the script lines. `enable_if` maps a path's final component to
/// its stored activation expression; empty means unguarded.
fn render<F>(out: &mut dyn Write, headers: &[String], paths: &[PathBuf], enable_if: F) -> Result<()>
where
    F: Fn(&str) -> Result<String>,
{
    for line in headers {
        writeln!(out, "{line}")?;
    }
    writeln!(out, "set runtimepath=")?;
    for path in paths {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let expr = enable_if(&name)?;
        if expr.is_empty() {
            writeln!(out, "set runtimepath+={}", path.display())?;
        } else {
            writeln!(out, "if {expr}")?;
            writeln!(out, "  set runtimepath+={}", path.display())?;
            writeln!(out, "endif")?;
        }
    }
    Ok(())
}
