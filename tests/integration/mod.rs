//! Integration test suite for vbm
//!
//! End-to-end tests driving the compiled binary against an isolated
//! managed root. No test touches the network: remote-shaped bundles are
//! seeded as directories under the repositories area, and anything that
//! needs a real repository builds one locally with git.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! Tests are organized by functionality area:
//! - **deploy**: enable/disable idempotence and conflict handling
//! - **fetch**: get over local bundles and failure isolation
//! - **inventory**: list reconstruction from the filesystem
//! - **metadata**: alias and dependency persistence
//! - **removal**: rm semantics for local and remote bundles

#[path = "../common/mod.rs"]
mod common;

mod deploy;
mod fetch;
mod inventory;
mod metadata;
mod removal;
