//! Version-control backend abstraction
//!
//! A [`VcsBackend`] exposes the three capabilities the engine needs from a
//! version-control tool: an origin capability probe, an idempotent
//! clone-or-update, and an uncommitted-changes check. Backends never touch
//! the network themselves; each capability delegates to exactly one
//! external tool invocation through [`command::VcsCommand`], which races
//! the child against the caller's [`CancelToken`].
//!
//! Backends live in an explicit [`VcsRegistry`] value constructed at
//! startup and passed into the engine. Selection probes backends in
//! registration order and takes the first positive match; no match is an
//! [`VbmError::UnsupportedOrigin`] before anything touches the filesystem.

pub mod command;
pub mod git;

pub use command::{VcsCommand, VcsOutput};
pub use git::GitBackend;

use crate::bundle::RemoteBundle;
use crate::core::{CancelToken, VbmError};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use url::Url;

/// Capability set every version-control backend implements.
#[async_trait]
pub trait VcsBackend: std::fmt::Debug + Send + Sync {
    /// Tool name for logs and error messages.
    fn name(&self) -> &'static str;

    /// Whether this backend can serve the origin. A negative answer from
    /// the probe tool is `Ok(false)`; only spawn failures and cancellation
    /// are errors.
    async fn can_handle(&self, cancel: &CancelToken, url: &Url) -> Result<bool>;

    /// Materialize the bundle's checkout. No checkout yet: full recursive
    /// clone. Checkout present: no-op unless `update`, then a
    /// fast-forward-only update that fails rather than merge.
    async fn clone_repo(
        &self,
        cancel: &CancelToken,
        bundle: &RemoteBundle,
        update: bool,
    ) -> Result<()>;

    /// Whether the checkout has uncommitted local changes. Used as a
    /// safety gate before destructive removal, never to stash or discard.
    async fn is_modified(&self, cancel: &CancelToken, bundle: &RemoteBundle) -> Result<bool>;
}

/// Ordered collection of backends, probed first-match.
///
/// Constructed once at startup and handed to the engine; there is no
/// global registration side channel.
#[derive(Clone, Default)]
pub struct VcsRegistry {
    backends: Vec<Arc<dyn VcsBackend>>,
}

impl VcsRegistry {
    /// An empty registry. Useful for tests; real callers want
    /// [`with_defaults`](Self::with_defaults).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the stock backends, currently just git.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(GitBackend::new()));
        registry
    }

    /// Append a backend; probing order is registration order.
    pub fn register(&mut self, backend: Arc<dyn VcsBackend>) {
        self.backends.push(backend);
    }

    /// Pick the first backend whose capability probe accepts the origin.
    ///
    /// # Errors
    ///
    /// [`VbmError::UnsupportedOrigin`] when every probe declines; probe
    /// failures (tool missing, cancellation) propagate as-is.
    pub async fn select(
        &self,
        cancel: &CancelToken,
        url: &Url,
    ) -> Result<Arc<dyn VcsBackend>> {
        for backend in &self.backends {
            if backend.can_handle(cancel, url).await? {
                tracing::debug!(target: "vcs", "{} accepts {url}", backend.name());
                return Ok(Arc::clone(backend));
            }
        }
        Err(VbmError::UnsupportedOrigin {
            url: url.to_string(),
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct RefusingBackend;

    #[async_trait]
    impl VcsBackend for RefusingBackend {
        fn name(&self) -> &'static str {
            "refuse"
        }

        async fn can_handle(&self, _cancel: &CancelToken, _url: &Url) -> Result<bool> {
            Ok(false)
        }

        async fn clone_repo(
            &self,
            _cancel: &CancelToken,
            _bundle: &RemoteBundle,
            _update: bool,
        ) -> Result<()> {
            unreachable!("never selected")
        }

        async fn is_modified(
            &self,
            _cancel: &CancelToken,
            _bundle: &RemoteBundle,
        ) -> Result<bool> {
            unreachable!("never selected")
        }
    }

    #[tokio::test]
    async fn test_no_matching_backend_is_unsupported_origin() {
        let mut registry = VcsRegistry::new();
        registry.register(Arc::new(RefusingBackend));

        let cancel = CancelToken::new();
        let url = Url::parse("https://example.com/a/b").unwrap();
        let err = registry.select(&cancel, &url).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<VbmError>(),
            Some(VbmError::UnsupportedOrigin { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_registry_rejects_everything() {
        let registry = VcsRegistry::new();
        let cancel = CancelToken::new();
        let url = Url::parse("https://example.com/a/b").unwrap();
        assert!(registry.select(&cancel, &url).await.is_err());
    }
}
