//! Error handling for vbm
//!
//! This module defines [`VbmError`], the enumerated error type for every
//! failure mode the bundle engine produces. Variants carry enough context
//! (references, paths, tool output) to render an actionable message, and
//! callers match on the kind to decide how a failure propagates.
//!
//! Most public APIs return [`anyhow::Result`] with a `VbmError` as the root
//! cause; use [`anyhow::Error::downcast_ref`] when the kind matters:
//!
//! ```rust,no_run
//! use vbm_cli::core::VbmError;
//!
//! fn classify(err: &anyhow::Error) -> &'static str {
//!     match err.downcast_ref::<VbmError>() {
//!         Some(VbmError::Cancelled) => "cancelled",
//!         Some(VbmError::Conflict { .. }) => "conflict",
//!         _ => "other",
//!     }
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for vbm operations.
///
/// Every engine call returns the first error it hits and performs no further
/// side effects within that call; there is no rollback, operations are
/// individually idempotent instead.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum VbmError {
    /// A reference string could not be normalized into a canonical URL or
    /// filesystem path.
    ///
    /// Produced by the identity resolver before anything touches the
    /// filesystem, and by decoding a repositories-directory name that does
    /// not round-trip into a valid URL.
    #[error("invalid bundle reference '{reference}': {reason}")]
    Resolution {
        /// The reference string as the user supplied it
        reference: String,
        /// Why it could not be resolved
        reason: String,
    },

    /// No registered version-control backend accepted the origin URL.
    ///
    /// Backends are probed in registration order; this is returned when
    /// every probe declines, before any filesystem effect.
    #[error("no version control backend can handle origin: {url}")]
    UnsupportedOrigin {
        /// The canonical origin URL that no backend accepted
        url: String,
    },

    /// An external tool exited nonzero or could not be spawned.
    #[error("{tool} {operation} failed: {stderr}")]
    BackendExecution {
        /// The external tool that was invoked (e.g. "git")
        tool: String,
        /// The operation that failed (e.g. "clone", "pull")
        operation: String,
        /// Captured standard error, or the spawn failure message
        stderr: String,
    },

    /// The operation was aborted because the supplied cancellation signal
    /// fired while waiting on an external process; the process has been
    /// killed.
    #[error("operation cancelled")]
    Cancelled,

    /// A deploy entry exists but is not a link owned by vbm, or points at
    /// an unexpected target. Never auto-resolved; the entry is left
    /// untouched.
    #[error("deploy entry {path} is in the way: {reason}")]
    Conflict {
        /// The deploy entry location
        path: PathBuf,
        /// What was found there
        reason: String,
    },

    /// Destructive removal was blocked because the checkout has uncommitted
    /// local changes. Re-run with force to delete anyway.
    #[error("refusing to remove modified checkout at {path}")]
    ModifiedCheckout {
        /// The checkout directory with local changes
        path: PathBuf,
    },

    /// A checkout was expected at this path but nothing is there.
    #[error("repository not cloned at {path}")]
    NotCloned {
        /// The expected checkout directory
        path: PathBuf,
    },

    /// The managed directory layout is broken, e.g. a plain file sits where
    /// a managed subdirectory belongs.
    #[error("managed directory problem at {path}: {reason}")]
    Layout {
        /// The offending path inside the managed root
        path: PathBuf,
        /// What is wrong with it
        reason: String,
    },

    /// Filesystem operation failure not covered by a more specific kind.
    #[error("file system error: {message}")]
    Io {
        /// Description of the failed operation
        message: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl VbmError {
    /// Wrap an I/O error with a description of the operation that failed.
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Resolution error for a reference, with a reason.
    pub fn resolution(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Resolution {
            reference: reference.into(),
            reason: reason.into(),
        }
    }
}
