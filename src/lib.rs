//! vbm - Vim Bundle Manager
//!
//! A Git-based bundle manager for Vim plugins. Given repository
//! references, vbm fetches them through a pluggable version-control
//! backend, tracks per-bundle metadata (aliases, dependencies, activation
//! expressions), and maintains the enabled set as filesystem links that a
//! generated runtimepath script hands to Vim at startup.
//!
//! # Architecture Overview
//!
//! The filesystem is the source of truth. Under one managed root:
//!
//! ```text
//! {root}/repositories/{percent-encoded canonical URL}/   VCS checkout
//! {root}/deploy/{bundleName}                             link to an enabled bundle
//! {root}/meta/{bundleName}                               JSON metadata document
//! ```
//!
//! Bundle values are never persisted; every query re-derives them by
//! resolving the reference, decoding directory names and merging the
//! metadata overlay. That keeps the checkout, the deploy link and the
//! metadata document the only durable state, each owned by exactly one
//! bundle name, which is what makes concurrent operations on different
//! bundles safe without coordination.
//!
//! # Core Modules
//!
//! - [`resolve`] - reference strings into canonical, content-addressed
//!   bundle identities
//! - [`meta`] - per-bundle metadata overlay documents with locked
//!   read-modify-write
//! - [`vcs`] - capability-probed backends with cancellable subprocess
//!   execution
//! - [`workspace`] - layout management, deploy-link reconciliation,
//!   listing, guarded removal and the bounded batch orchestrator
//! - [`script`] - runtimepath script generation for Vim
//!
//! # Supporting Modules
//!
//! - [`bundle`] - the Remote/Local bundle union
//! - [`cli`] - clap-based command surface
//! - [`config`] - managed root and parallelism settings
//! - [`core`] - error types and the cancellation token
//!
//! # Example
//!
//! ```rust,no_run
//! use vbm_cli::config::Config;
//! use vbm_cli::core::CancelToken;
//! use vbm_cli::vcs::VcsRegistry;
//! use vbm_cli::workspace::Workspace;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::resolve(None, None)?;
//! let workspace = Workspace::new(config, VcsRegistry::with_defaults());
//! workspace.ensure_layout()?;
//!
//! let cancel = CancelToken::new();
//! workspace
//!     .get(&cancel, "tpope/vim-fugitive", false, true)
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod bundle;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod meta;
pub mod resolve;
pub mod script;
pub mod vcs;
pub mod workspace;
