//! Shared helpers for integration tests.
//!
//! Every test gets an isolated managed root inside a temp directory and
//! drives the compiled `vbm` binary against it, so tests never touch the
//! user's real `~/.vbm` and can run in parallel.

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestRoot {
    temp: TempDir,
}

impl TestRoot {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().expect("create temp dir"),
        }
    }

    /// The managed root handed to vbm via `--root`.
    pub fn root(&self) -> PathBuf {
        self.temp.path().join("managed")
    }

    /// A `vbm` invocation pinned to this root, isolated from the
    /// environment.
    pub fn vbm(&self) -> Command {
        let mut cmd = Command::cargo_bin("vbm").expect("vbm binary");
        cmd.arg("--root").arg(self.root());
        cmd.env_remove("VBM_HOME");
        cmd.env_remove("VBM_MAX_PARALLEL");
        cmd
    }

    /// Create a plugin directory outside the managed root, with the usual
    /// `plugin/` layout.
    pub fn plugin_dir(&self, name: &str) -> PathBuf {
        let dir = self.temp.path().join(name);
        std::fs::create_dir_all(dir.join("plugin")).expect("create plugin dir");
        std::fs::write(dir.join("plugin").join("main.vim"), "\" main\n")
            .expect("write plugin file");
        dir
    }

    /// Path of a bundle's deploy entry.
    pub fn deploy_entry(&self, name: &str) -> PathBuf {
        self.root().join("deploy").join(name)
    }

    /// Path of a bundle's metadata document.
    pub fn meta_doc(&self, name: &str) -> PathBuf {
        self.root().join("meta").join(name)
    }

    /// Create a fake checkout directory for a canonical URL, the way a
    /// completed clone would leave it.
    pub fn seed_checkout(&self, encoded: &str) -> PathBuf {
        let dir = self.root().join("repositories").join(encoded);
        std::fs::create_dir_all(&dir).expect("create checkout dir");
        std::fs::write(dir.join("README"), "seeded\n").expect("write checkout file");
        dir
    }
}
