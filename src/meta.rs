//! Metadata overlay store
//!
//! Per-bundle attributes that cannot be derived from the checkout itself:
//! aliases, dependency URLs, the activation expression and the opaque build
//! map. Each bundle name owns one JSON document under `{root}/meta/`; a
//! missing or empty document reads as empty defaults, never an error.
//!
//! Mutations follow a strict read-modify-write cycle: decode the existing
//! document, change exactly one key, truncate and re-encode the whole
//! document. The cycle runs under a per-name exclusive file lock (see
//! [`MetaLock`]) so concurrent writers targeting the same bundle serialize
//! instead of losing updates; writers for different bundles never contend.

use crate::bundle::BuildScript;
use crate::constants::META_LOCKS_DIR;
use anyhow::{Context, Result};
use fs4::fs_std::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// One bundle's persisted overlay document.
///
/// All keys are optional on disk; [`Default`] is the absent document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaDoc {
    /// Alternative names for the bundle.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,

    /// Canonical URLs of bundles this one depends on. Stored by URL, not by
    /// display name: names are not unique across origins.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,

    /// Opaque Vim expression guarding activation; empty means always on.
    #[serde(rename = "enableIf", skip_serializing_if = "String::is_empty")]
    pub enable_if: String,

    /// Per-OS build commands, carried for external tooling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<BuildScript>,
}

/// Store of per-bundle overlay documents inside the managed meta area.
#[derive(Debug, Clone)]
pub struct MetaStore {
    dir: PathBuf,
}

impl MetaStore {
    /// Create a store over the given meta directory. The directory is
    /// created lazily on first write.
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn doc_path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Read a bundle's overlay document. Missing and empty documents read
    /// as [`MetaDoc::default`].
    pub fn read(&self, name: &str) -> Result<MetaDoc> {
        let path = self.doc_path(name);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(MetaDoc::default()),
            Err(e) => {
                return Err(e).context(format!("failed to read metadata at {}", path.display()));
            }
        };
        if raw.trim().is_empty() {
            return Ok(MetaDoc::default());
        }
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid metadata document at {}", path.display()))
    }

    /// Apply one mutation to a bundle's document under its exclusive lock:
    /// read, mutate, truncate, rewrite.
    ///
    /// Callers mutate exactly one key per public operation; the closure
    /// gets the freshly-decoded document.
    pub async fn update<F>(&self, name: &str, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut MetaDoc),
    {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create meta directory {}", self.dir.display()))?;

        let _lock = MetaLock::acquire(&self.dir, name).await?;

        let mut doc = self.read(name)?;
        mutate(&mut doc);

        let path = self.doc_path(name);
        let encoded =
            serde_json::to_vec(&doc).with_context(|| format!("failed to encode metadata for {name}"))?;
        std::fs::write(&path, encoded)
            .with_context(|| format!("failed to write metadata at {}", path.display()))?;
        Ok(())
    }
}

/// Exclusive per-bundle lock serializing metadata read-modify-write cycles.
///
/// Backed by an OS advisory file lock under `meta/.locks/`, so it holds
/// across processes as well as tasks. Released on drop.
pub struct MetaLock {
    _file: File,
    path: PathBuf,
}

impl MetaLock {
    /// Acquire the exclusive lock for one bundle name, blocking (on the
    /// blocking thread pool) until any other holder releases it.
    pub async fn acquire(meta_dir: &Path, name: &str) -> Result<Self> {
        let locks_dir = meta_dir.join(META_LOCKS_DIR);
        tokio::fs::create_dir_all(&locks_dir)
            .await
            .with_context(|| format!("failed to create locks directory {}", locks_dir.display()))?;

        let lock_path = locks_dir.join(format!("{name}.lock"));
        let lock_path_clone = lock_path.clone();
        let name = name.to_string();

        // File locking is blocking; keep it off the async runtime.
        let file = tokio::task::spawn_blocking(move || -> Result<File> {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&lock_path_clone)
                .with_context(|| {
                    format!("failed to open lock file {}", lock_path_clone.display())
                })?;
            file.lock_exclusive()
                .with_context(|| format!("failed to acquire metadata lock for {name}"))?;
            Ok(file)
        })
        .await
        .context("lock acquisition task failed")??;

        Ok(Self {
            _file: file,
            path: lock_path,
        })
    }
}

impl Drop for MetaLock {
    fn drop(&mut self) {
        #[allow(unstable_name_collisions)]
        if let Err(e) = self._file.unlock() {
            tracing::warn!("failed to unlock {}: {}", self.path.display(), e);
        }
    }
}
