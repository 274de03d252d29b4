//! The managed workspace
//!
//! [`Workspace`] owns the managed directory layout and ties the engine
//! together: reference resolution with the metadata overlay merged in, the
//! deploy-link reconciler, filesystem-derived listing, guarded removal, and
//! the bounded batch fetch orchestrator.
//!
//! ```text
//! {root}/
//!   repositories/{percent-encoded canonical URL}/   VCS checkout
//!   deploy/{bundleName}                             link to an enabled bundle
//!   meta/{bundleName}                               JSON metadata document
//! ```
//!
//! There is no persisted registry: every query re-derives bundle values
//! from directory names, checkout state and metadata documents. Operations
//! on different bundle names own disjoint filesystem subtrees and are safe
//! to run fully in parallel; concurrent operations against the same name
//! are the caller's misuse (only the metadata store serializes them).

use crate::bundle::{Bundle, LocalBundle, RemoteBundle};
use crate::config::Config;
use crate::constants::{DEPLOY_DIR, META_DIR, REPOSITORIES_DIR};
use crate::core::{CancelToken, VbmError};
use crate::meta::MetaStore;
use crate::resolve;
use crate::vcs::VcsRegistry;
use anyhow::{Context, Result, bail};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use url::Url;

/// Result of one reference inside a batch `get`.
#[derive(Debug)]
pub struct GetOutcome {
    /// The reference as given on the command line.
    pub reference: String,
    /// Success, or the first error that reference hit.
    pub result: Result<()>,
}

/// Engine facade over one managed root.
pub struct Workspace {
    root: PathBuf,
    max_parallel: usize,
    registry: VcsRegistry,
    meta: MetaStore,
}

impl Workspace {
    /// Build a workspace over the configured root with an explicit backend
    /// registry.
    #[must_use]
    pub fn new(config: Config, registry: VcsRegistry) -> Self {
        let meta = MetaStore::new(config.root.join(META_DIR));
        Self {
            root: config.root,
            max_parallel: config.max_parallel,
            registry,
            meta,
        }
    }

    /// The managed root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Checkout area: one directory per remote bundle.
    #[must_use]
    pub fn repositories_dir(&self) -> PathBuf {
        self.root.join(REPOSITORIES_DIR)
    }

    /// Enabled-set area: one link per enabled bundle.
    #[must_use]
    pub fn deploy_dir(&self) -> PathBuf {
        self.root.join(DEPLOY_DIR)
    }

    /// Metadata overlay area.
    #[must_use]
    pub fn meta_dir(&self) -> PathBuf {
        self.root.join(META_DIR)
    }

    /// Create the managed layout if missing. A plain file sitting where a
    /// managed directory belongs is a layout error, not overwritten.
    pub fn ensure_layout(&self) -> Result<()> {
        for dir in [
            self.root.clone(),
            self.repositories_dir(),
            self.deploy_dir(),
            self.meta_dir(),
        ] {
            match std::fs::metadata(&dir) {
                Err(_) => {
                    std::fs::create_dir_all(&dir).map_err(|e| {
                        VbmError::io(format!("failed to create {}", dir.display()), e)
                    })?;
                }
                Ok(meta) if !meta.is_dir() => {
                    return Err(VbmError::Layout {
                        path: dir,
                        reason: "expected a directory, found a file".to_string(),
                    }
                    .into());
                }
                Ok(_) => {}
            }
        }
        Ok(())
    }

    // ---- resolution ----------------------------------------------------

    /// Resolve a reference string into a bundle value, metadata overlay
    /// merged. Never creates directories.
    ///
    /// Local dispatch first: a `file://` reference or an existing
    /// filesystem path is a local bundle; everything else goes through the
    /// canonical-URL rules in [`crate::resolve`].
    pub fn resolve(&self, reference: &str) -> Result<Bundle> {
        if let Some(stripped) = reference.strip_prefix("file://") {
            return Ok(Bundle::Local(self.local_bundle(Path::new(stripped))?));
        }
        let as_path = Path::new(reference);
        if as_path.exists() {
            return Ok(Bundle::Local(self.local_bundle(as_path)?));
        }
        let mut seen = HashSet::new();
        Ok(Bundle::Remote(
            self.remote_bundle_from_ref(reference, &mut seen)?,
        ))
    }

    fn local_bundle(&self, path: &Path) -> Result<LocalBundle> {
        let path = std::path::absolute(path)
            .map_err(|e| VbmError::io(format!("cannot absolutize {}", path.display()), e))?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                VbmError::resolution(
                    path.display().to_string(),
                    "path has no usable final component",
                )
            })?;
        let aliases = self.meta.read(&name)?.aliases;
        Ok(LocalBundle {
            name,
            local_path: path,
            aliases,
        })
    }

    fn remote_bundle_from_ref(
        &self,
        reference: &str,
        seen: &mut HashSet<String>,
    ) -> Result<RemoteBundle> {
        let url = resolve::canonical_url(reference)?;
        self.remote_bundle(&url, seen)
    }

    /// Rebuild a remote bundle from its canonical URL, recursing into
    /// stored dependency URLs. `seen` tracks the current resolution path
    /// so a cycle written into a metadata document surfaces as a
    /// resolution error instead of unbounded recursion.
    fn remote_bundle(&self, url: &Url, seen: &mut HashSet<String>) -> Result<RemoteBundle> {
        if !seen.insert(url.as_str().to_string()) {
            return Err(VbmError::resolution(url.as_str(), "dependency cycle detected").into());
        }
        let name = resolve::bundle_name(url)?;
        let local_path = self.repositories_dir().join(resolve::repo_dir_name(url));
        let doc = self.meta.read(&name)?;

        let mut dependencies = Vec::new();
        for dep in &doc.dependencies {
            dependencies.push(self.remote_bundle_from_ref(dep, seen)?);
        }
        seen.remove(url.as_str());

        Ok(RemoteBundle {
            name,
            url: url.clone(),
            local_path,
            aliases: doc.aliases,
            dependencies,
            enable_if: doc.enable_if,
            build: doc.build,
        })
    }

    /// Stored activation expression for a bundle name; empty when none.
    pub fn enable_if_expr(&self, name: &str) -> Result<String> {
        Ok(self.meta.read(name)?.enable_if)
    }

    // ---- deploy reconciler ---------------------------------------------

    fn deploy_path(&self, name: &str) -> PathBuf {
        self.deploy_dir().join(name)
    }

    /// Whether a deploy entry exists for the bundle.
    #[must_use]
    pub fn is_enabled(&self, bundle: &Bundle) -> bool {
        std::fs::metadata(self.deploy_path(bundle.name())).is_ok()
    }

    /// Enable a bundle: materialize its deploy link.
    ///
    /// Absent entry: create a link with a target relative to the deploy
    /// directory, so the managed tree stays relocatable. Link already
    /// pointing at the bundle: no-op success. Anything else at that
    /// location: [`VbmError::Conflict`], entry untouched.
    pub async fn enable(&self, reference: &str) -> Result<()> {
        let bundle = self.resolve(reference)?;
        self.enable_bundle(&bundle)
    }

    fn enable_bundle(&self, bundle: &Bundle) -> Result<()> {
        let entry = self.deploy_path(bundle.name());
        let target = links::relative_target(&self.deploy_dir(), bundle.local_path());
        match std::fs::symlink_metadata(&entry) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                links::create(&target, &entry).map_err(|e| {
                    VbmError::io(format!("failed to create link {}", entry.display()), e)
                })?;
                tracing::info!("enabled {}", bundle.name());
                Ok(())
            }
            Err(e) => {
                Err(VbmError::io(format!("failed to inspect {}", entry.display()), e).into())
            }
            Ok(meta) if links::is_link(&meta, &entry) => {
                let existing = std::fs::read_link(&entry).map_err(|e| {
                    VbmError::io(format!("failed to read link {}", entry.display()), e)
                })?;
                if existing == target || links::points_at(&entry, bundle.local_path()) {
                    return Ok(());
                }
                Err(VbmError::Conflict {
                    path: entry,
                    reason: format!(
                        "links to {} instead of {}",
                        existing.display(),
                        target.display()
                    ),
                }
                .into())
            }
            Ok(_) => Err(VbmError::Conflict {
                path: entry,
                reason: "exists and is not a link".to_string(),
            }
            .into()),
        }
    }

    /// Store a non-empty activation expression, then enable.
    pub async fn enable_if(&self, reference: &str, expr: &str) -> Result<()> {
        if expr.trim().is_empty() {
            bail!("activation expression must not be empty");
        }
        let bundle = self.resolve(reference)?;
        let expr = expr.to_string();
        self.meta
            .update(bundle.name(), move |doc| doc.enable_if = expr)
            .await?;
        self.enable_bundle(&bundle)
    }

    /// Disable a bundle: remove its deploy link.
    ///
    /// Absent entry: no-op success. A non-link object at that location is
    /// a conflict and nothing is removed.
    pub async fn disable(&self, reference: &str) -> Result<()> {
        let bundle = self.resolve(reference)?;
        let entry = self.deploy_path(bundle.name());
        match std::fs::symlink_metadata(&entry) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(VbmError::io(format!("failed to inspect {}", entry.display()), e).into())
            }
            Ok(meta) if links::is_link(&meta, &entry) => {
                links::remove(&entry).map_err(|e| {
                    VbmError::io(format!("failed to remove link {}", entry.display()), e)
                })?;
                tracing::info!("disabled {}", bundle.name());
                Ok(())
            }
            Ok(_) => Err(VbmError::Conflict {
                path: entry,
                reason: "exists and is not a link".to_string(),
            }
            .into()),
        }
    }

    // ---- queries -------------------------------------------------------

    /// Inventory of every managed bundle, derived fresh from the
    /// filesystem: repositories-directory names decode back into remote
    /// bundles, and deploy entries resolving outside the repositories area
    /// are reported as local bundles (entries resolving inside it are the
    /// remote bundles' own links and are not double-counted).
    pub fn list(&self) -> Result<Vec<Bundle>> {
        let mut bundles = Vec::new();

        let repos_dir = self.repositories_dir();
        for entry in sorted_entries(&repos_dir)? {
            if !entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }
            let dir_name = entry.file_name().to_string_lossy().into_owned();
            let url = resolve::decode_repo_dir_name(&dir_name)?;
            let mut seen = HashSet::new();
            bundles.push(Bundle::Remote(self.remote_bundle(&url, &mut seen)?));
        }

        let repos_real = std::fs::canonicalize(&repos_dir).unwrap_or(repos_dir);
        for entry in sorted_entries(&self.deploy_dir())? {
            let path = entry.path();
            let real = std::fs::canonicalize(&path).map_err(|e| {
                VbmError::io(format!("failed to resolve deploy entry {}", path.display()), e)
            })?;
            if real.starts_with(&repos_real) {
                continue;
            }
            bundles.push(Bundle::Local(self.local_bundle(&real)?));
        }

        Ok(bundles)
    }

    // ---- fetch and removal ---------------------------------------------

    /// Fetch one bundle: select a backend and clone or update the checkout
    /// (a local bundle needs no clone), then optionally enable it.
    pub async fn get(
        &self,
        cancel: &CancelToken,
        reference: &str,
        update: bool,
        enable: bool,
    ) -> Result<()> {
        let bundle = self.resolve(reference)?;
        if let Bundle::Remote(ref remote) = bundle {
            let backend = self.registry.select(cancel, &remote.url).await?;
            backend.clone_repo(cancel, remote, update).await?;
        }
        if enable {
            self.enable_bundle(&bundle)?;
        }
        Ok(())
    }

    /// Batch fetch: one worker per reference, bounded by the configured
    /// parallelism. Each reference's error is caught and reported against
    /// that reference alone; the call returns only after every worker has
    /// completed, outcomes in input order.
    pub async fn get_many(
        &self,
        cancel: &CancelToken,
        references: &[String],
        update: bool,
        enable: bool,
    ) -> Vec<GetOutcome> {
        let mut outcomes: Vec<(usize, GetOutcome)> =
            stream::iter(references.iter().enumerate().map(|(index, reference)| {
                let cancel = cancel.clone();
                async move {
                    let result = self.get(&cancel, reference, update, enable).await;
                    if let Err(ref e) = result {
                        tracing::debug!("({reference}) {e:#}");
                    }
                    (
                        index,
                        GetOutcome {
                            reference: reference.clone(),
                            result,
                        },
                    )
                }
            }))
            .buffer_unordered(self.max_parallel.max(1))
            .collect()
            .await;
        outcomes.sort_by_key(|(index, _)| *index);
        outcomes.into_iter().map(|(_, outcome)| outcome).collect()
    }

    /// Remove a bundle: disable first, then delete the checkout.
    ///
    /// Local bundles stop after disabling - the external directory is
    /// never deleted. Remote bundles pass the modification gate unless
    /// `force`: uncommitted changes abort the removal with
    /// [`VbmError::ModifiedCheckout`] and nothing is deleted.
    pub async fn remove(&self, cancel: &CancelToken, reference: &str, force: bool) -> Result<()> {
        self.disable(reference).await?;

        let bundle = self.resolve(reference)?;
        let Bundle::Remote(remote) = bundle else {
            return Ok(());
        };

        if !force {
            let backend = self.registry.select(cancel, &remote.url).await?;
            if backend
                .is_modified(cancel, &remote)
                .await
                .context("modification check failed")?
            {
                return Err(VbmError::ModifiedCheckout {
                    path: remote.local_path,
                }
                .into());
            }
        }

        if std::fs::metadata(&remote.local_path).is_ok() {
            tokio::fs::remove_dir_all(&remote.local_path)
                .await
                .map_err(|e| {
                    VbmError::io(
                        format!("failed to delete checkout {}", remote.local_path.display()),
                        e,
                    )
                })?;
            tracing::info!("removed {}", remote.name);
        }
        Ok(())
    }

    // ---- metadata mutations --------------------------------------------

    /// Append an alias to the bundle's overlay.
    pub async fn add_alias(&self, reference: &str, alias: &str) -> Result<()> {
        let bundle = self.resolve(reference)?;
        let alias = alias.to_string();
        self.meta
            .update(bundle.name(), move |doc| {
                if !doc.aliases.contains(&alias) {
                    doc.aliases.push(alias);
                }
            })
            .await
    }

    /// Drop one alias from the bundle's overlay, by equality.
    pub async fn remove_alias(&self, reference: &str, alias: &str) -> Result<()> {
        let bundle = self.resolve(reference)?;
        let alias = alias.to_string();
        self.meta
            .update(bundle.name(), move |doc| doc.aliases.retain(|a| *a != alias))
            .await
    }

    /// Empty the bundle's alias list.
    pub async fn clear_aliases(&self, reference: &str) -> Result<()> {
        let bundle = self.resolve(reference)?;
        self.meta
            .update(bundle.name(), |doc| doc.aliases.clear())
            .await
    }

    /// Record a dependency, stored by canonical URL.
    ///
    /// No-op success for local bundles. The dependency reference is
    /// resolved first; a dependency whose transitive closure already
    /// reaches this bundle is refused, so cycles cannot be written.
    pub async fn add_dependency(&self, reference: &str, dependency: &str) -> Result<()> {
        let Bundle::Remote(remote) = self.resolve(reference)? else {
            return Ok(());
        };

        let mut seen = HashSet::new();
        let dep = self.remote_bundle_from_ref(dependency, &mut seen)?;
        if dep.url == remote.url || closure_contains(&dep, remote.url.as_str()) {
            return Err(VbmError::resolution(
                dependency,
                format!("would create a dependency cycle with {}", remote.name),
            )
            .into());
        }

        let dep_url = dep.url.to_string();
        self.meta
            .update(&remote.name, move |doc| {
                if !doc.dependencies.contains(&dep_url) {
                    doc.dependencies.push(dep_url);
                }
            })
            .await
    }

    /// Drop a dependency, compared by canonical URL.
    pub async fn remove_dependency(&self, reference: &str, dependency: &str) -> Result<()> {
        let Bundle::Remote(remote) = self.resolve(reference)? else {
            return Ok(());
        };
        let Bundle::Remote(dep) = self.resolve(dependency)? else {
            return Ok(());
        };
        let dep_url = dep.url.to_string();
        self.meta
            .update(&remote.name, move |doc| {
                doc.dependencies.retain(|d| *d != dep_url)
            })
            .await
    }

    /// Empty the bundle's dependency list.
    pub async fn clear_dependencies(&self, reference: &str) -> Result<()> {
        let Bundle::Remote(remote) = self.resolve(reference)? else {
            return Ok(());
        };
        self.meta
            .update(&remote.name, |doc| doc.dependencies.clear())
            .await
    }
}

/// Whether `url` appears anywhere in the bundle's dependency closure.
fn closure_contains(bundle: &RemoteBundle, url: &str) -> bool {
    bundle
        .dependencies
        .iter()
        .any(|dep| dep.url.as_str() == url || closure_contains(dep, url))
}

/// Directory entries sorted by name, for deterministic iteration order.
fn sorted_entries(dir: &Path) -> Result<Vec<std::fs::DirEntry>> {
    let mut entries = std::fs::read_dir(dir)
        .map_err(|e| VbmError::io(format!("failed to read {}", dir.display()), e))?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| VbmError::io(format!("failed to read {}", dir.display()), e))?;
    entries.sort_by_key(std::fs::DirEntry::file_name);
    Ok(entries)
}

/// Platform link plumbing: symlinks everywhere they work, junctions as the
/// Windows fallback.
mod links {
    use std::io;
    use std::path::{Component, Path, PathBuf};

    /// Link target relative to the deploy directory, falling back to the
    /// absolute path when the two share no root (e.g. different drives).
    pub(super) fn relative_target(deploy_dir: &Path, target: &Path) -> PathBuf {
        relative_path(deploy_dir, target).unwrap_or_else(|| target.to_path_buf())
    }

    fn relative_path(from: &Path, to: &Path) -> Option<PathBuf> {
        let from: Vec<Component> = from.components().collect();
        let to: Vec<Component> = to.components().collect();
        let mut common = 0;
        while common < from.len() && common < to.len() && from[common] == to[common] {
            common += 1;
        }
        if common == 0 {
            return None;
        }
        let mut rel = PathBuf::new();
        for _ in common..from.len() {
            rel.push("..");
        }
        for component in &to[common..] {
            rel.push(component.as_os_str());
        }
        if rel.as_os_str().is_empty() {
            rel.push(".");
        }
        Some(rel)
    }

    /// Whether the deploy entry ultimately resolves to the same directory
    /// as the bundle path. Covers junctions, whose stored target is
    /// absolute rather than the relative form we would write today.
    pub(super) fn points_at(entry: &Path, target: &Path) -> bool {
        match (std::fs::canonicalize(entry), std::fs::canonicalize(target)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }

    #[cfg(unix)]
    pub(super) fn create(target: &Path, entry: &Path) -> io::Result<()> {
        std::os::unix::fs::symlink(target, entry)
    }

    #[cfg(windows)]
    pub(super) fn create(target: &Path, entry: &Path) -> io::Result<()> {
        // Directory symlinks need a privilege on stock Windows; fall back
        // to a junction, which takes an absolute target.
        match std::os::windows::fs::symlink_dir(target, entry) {
            Ok(()) => Ok(()),
            Err(_) => {
                let joined = entry
                    .parent()
                    .map_or_else(|| target.to_path_buf(), |parent| parent.join(target));
                let absolute = std::path::absolute(joined)?;
                let status = std::process::Command::new("cmd")
                    .args(["/C", "mklink", "/J"])
                    .arg(entry)
                    .arg(&absolute)
                    .status()?;
                if status.success() {
                    Ok(())
                } else {
                    Err(io::Error::other("mklink /J failed"))
                }
            }
        }
    }

    pub(super) fn is_link(meta: &std::fs::Metadata, entry: &Path) -> bool {
        if meta.file_type().is_symlink() {
            return true;
        }
        #[cfg(windows)]
        {
            // Junctions are reparse points but not symlinks to std.
            if std::fs::read_link(entry).is_ok() {
                return true;
            }
        }
        #[cfg(not(windows))]
        let _ = entry;
        false
    }

    #[cfg(unix)]
    pub(super) fn remove(entry: &Path) -> io::Result<()> {
        std::fs::remove_file(entry)
    }

    #[cfg(windows)]
    pub(super) fn remove(entry: &Path) -> io::Result<()> {
        // Directory links and junctions are removed as directories.
        std::fs::remove_dir(entry).or_else(|_| std::fs::remove_file(entry))
    }
}
