//! Global constants used throughout the vbm codebase.
//!
//! Directory names of the managed layout, environment variable names, and
//! the canonical hosts used by reference resolution. Defining them centrally
//! keeps the layout discoverable and the resolution rules free of magic
//! strings.

/// Subdirectory of the managed root holding one VCS checkout per remote
/// bundle, named by the percent-encoded canonical URL.
pub const REPOSITORIES_DIR: &str = "repositories";

/// Subdirectory of the managed root holding one link per enabled bundle.
pub const DEPLOY_DIR: &str = "deploy";

/// Subdirectory of the managed root holding one JSON metadata document per
/// bundle name.
pub const META_DIR: &str = "meta";

/// Lock files for metadata read-modify-write cycles, under the meta area.
pub const META_LOCKS_DIR: &str = ".locks";

/// Environment variable overriding the managed root directory.
pub const ENV_ROOT: &str = "VBM_HOME";

/// Environment variable overriding the batch fetch parallelism bound.
pub const ENV_MAX_PARALLEL: &str = "VBM_MAX_PARALLEL";

/// Default bound for concurrent fetches in a batch `get`.
pub const DEFAULT_MAX_PARALLEL: usize = 4;

/// Host that `owner/name` shorthand references expand against.
pub const SHORTHAND_BASE: &str = "https://github.com";

/// Account that bare-name references expand against, the legacy community
/// mirror of vim.org scripts.
pub const LEGACY_MIRROR_OWNER: &str = "vim-scripts";
