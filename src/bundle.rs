//! Bundle data model
//!
//! A bundle is one managed unit: either a [`RemoteBundle`] backed by a VCS
//! checkout under the managed root, or a [`LocalBundle`] pointing at a
//! directory vbm does not own. The two variants share the capability set
//! {name, local path, aliases} through accessors on the [`Bundle`] union.
//!
//! Bundle values are never persisted. They are re-derived on every call by
//! resolving the reference string, inspecting the checkout, and merging the
//! metadata overlay; only the overlay document, the checkout directory and
//! the deploy link are durable state.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// One managed unit, remote or local.
///
/// Match exhaustively at resolution, listing and removal sites; use the
/// accessors when only the shared capability set matters.
#[derive(Debug, Clone)]
pub enum Bundle {
    /// VCS-backed bundle whose checkout lives under the repositories area.
    Remote(RemoteBundle),
    /// Externally-owned directory; vbm links it but never deletes it.
    Local(LocalBundle),
}

impl Bundle {
    /// Display name, unique across the managed areas.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Remote(b) => &b.name,
            Self::Local(b) => &b.name,
        }
    }

    /// Directory the deploy link points at.
    #[must_use]
    pub fn local_path(&self) -> &Path {
        match self {
            Self::Remote(b) => &b.local_path,
            Self::Local(b) => &b.local_path,
        }
    }

    /// Alias names from the metadata overlay, empty when none are stored.
    #[must_use]
    pub fn aliases(&self) -> &[String] {
        match self {
            Self::Remote(b) => &b.aliases,
            Self::Local(b) => &b.aliases,
        }
    }
}

/// A bundle fetched from a version-control origin.
///
/// Identity is the canonical URL; the name is derived from its last path
/// segment and the checkout path from its percent-encoded form, so the
/// whole value can be reconstructed from the filesystem alone.
#[derive(Debug, Clone)]
pub struct RemoteBundle {
    /// Last path segment of the canonical URL.
    pub name: String,
    /// Canonical origin URL produced by the resolution rules.
    pub url: Url,
    /// Checkout directory: `{root}/repositories/{percent-encode(url)}`.
    pub local_path: PathBuf,
    /// Alias names from the metadata overlay.
    pub aliases: Vec<String>,
    /// Dependencies resolved recursively from stored canonical URLs.
    pub dependencies: Vec<RemoteBundle>,
    /// Opaque activation expression; vbm stores it, Vim evaluates it.
    pub enable_if: String,
    /// Optional per-OS build script map, stored and surfaced opaquely.
    pub build: Option<BuildScript>,
}

/// A bundle rooted in a directory outside the managed tree.
#[derive(Debug, Clone)]
pub struct LocalBundle {
    /// Final path component of the directory.
    pub name: String,
    /// The external directory as given (scheme prefix stripped).
    pub local_path: PathBuf,
    /// Alias names from the metadata overlay.
    pub aliases: Vec<String>,
}

/// Per-OS build commands attached to a remote bundle.
///
/// vbm never executes these; they are carried in the metadata overlay for
/// external tooling to consume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildScript {
    /// Command for Windows hosts.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub windows: String,
    /// Command for macOS hosts.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mac: String,
    /// Command for Linux hosts.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub linux: String,
    /// Fallback command for every host.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub all: String,
}
