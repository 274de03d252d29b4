//! Repository reference resolution
//!
//! Turns user-supplied reference strings into canonical bundle identities.
//! The rules, applied in order:
//!
//! 1. absolute `http://` / `https://` URL - taken as the canonical URL
//!    unchanged (modulo URL normalization);
//! 2. `owner/name` shorthand (exactly one separator) - expanded against
//!    github.com;
//! 3. bare name (no separator) - expanded against the legacy
//!    `vim-scripts` community mirror.
//!
//! Anything else is a resolution error. Local paths never reach this
//! module; [`crate::workspace::Workspace::resolve`] dispatches them first.
//!
//! The canonical URL also addresses the checkout on disk:
//! [`repo_dir_name`] percent-encodes it into a single path component and
//! [`decode_repo_dir_name`] is the exact inverse, which is what lets
//! `list` rebuild every remote bundle from directory names alone with no
//! registry.

use crate::constants::{LEGACY_MIRROR_OWNER, SHORTHAND_BASE};
use crate::core::VbmError;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use url::Url;

/// Bytes escaped in repositories-directory names: everything outside the
/// unreserved alphabet `[A-Za-z0-9-._~]`, so the encoded form is a single
/// safe path component on every platform.
const REPO_DIR_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Apply the resolution rules to a non-path reference string.
///
/// # Errors
///
/// Returns [`VbmError::Resolution`] for references that cannot be formed
/// into a valid URL: malformed absolute URLs, shorthands with an empty
/// owner or name, and references with two or more separators.
pub fn canonical_url(reference: &str) -> Result<Url, VbmError> {
    if reference.starts_with("https://") || reference.starts_with("http://") {
        return Url::parse(reference)
            .map_err(|e| VbmError::resolution(reference, format!("not a valid URL: {e}")));
    }

    match reference.matches('/').count() {
        0 if !reference.is_empty() => {
            let expanded = format!("{SHORTHAND_BASE}/{LEGACY_MIRROR_OWNER}/{reference}");
            Url::parse(&expanded)
                .map_err(|e| VbmError::resolution(reference, format!("not a valid URL: {e}")))
        }
        1 => {
            let (owner, name) = reference.split_once('/').unwrap_or((reference, ""));
            if owner.is_empty() || name.is_empty() {
                return Err(VbmError::resolution(
                    reference,
                    "shorthand must be owner/name with both parts non-empty",
                ));
            }
            let expanded = format!("{SHORTHAND_BASE}/{reference}");
            Url::parse(&expanded)
                .map_err(|e| VbmError::resolution(reference, format!("not a valid URL: {e}")))
        }
        0 => Err(VbmError::resolution(reference, "empty reference")),
        _ => Err(VbmError::resolution(
            reference,
            "neither an absolute URL, an owner/name shorthand, nor a bare name",
        )),
    }
}

/// Derive the bundle name: the last non-empty path segment of the
/// canonical URL.
pub fn bundle_name(url: &Url) -> Result<String, VbmError> {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
        .map(str::to_string)
        .ok_or_else(|| {
            VbmError::resolution(url.as_str(), "URL has no path segment to name the bundle")
        })
}

/// Encode a canonical URL into its repositories-directory name.
#[must_use]
pub fn repo_dir_name(url: &Url) -> String {
    utf8_percent_encode(url.as_str(), REPO_DIR_ESCAPE).to_string()
}

/// Decode a repositories-directory name back into the canonical URL that
/// created it. Inverse of [`repo_dir_name`].
///
/// # Errors
///
/// Returns [`VbmError::Resolution`] when the name is not valid UTF-8 after
/// unescaping or does not decode into a parseable URL.
pub fn decode_repo_dir_name(name: &str) -> Result<Url, VbmError> {
    let decoded = percent_decode_str(name)
        .decode_utf8()
        .map_err(|e| VbmError::resolution(name, format!("directory name is not UTF-8: {e}")))?;
    Url::parse(&decoded)
        .map_err(|e| VbmError::resolution(name, format!("directory name is not a URL: {e}")))
}
