//! `vbm rm` semantics.
//!
//! The unforced modification gate needs a reachable origin for the
//! backend probe, so it is covered by unit tests with a stub backend;
//! here we exercise the paths that stay on the local filesystem.

use crate::common::TestRoot;

const ENCODED: &str = "https%3A%2F%2Fgithub.com%2Fkamichidu%2Fvim-hariti";

#[test]
fn test_forced_removal_deletes_checkout_and_link() {
    let root = TestRoot::new();
    let checkout = root.seed_checkout(ENCODED);

    root.vbm()
        .args(["enable", "kamichidu/vim-hariti"])
        .assert()
        .success();

    root.vbm()
        .args(["rm", "kamichidu/vim-hariti", "--force"])
        .assert()
        .success();

    assert!(!checkout.exists(), "checkout must be deleted");
    assert!(std::fs::symlink_metadata(root.deploy_entry("vim-hariti")).is_err());
}

#[test]
fn test_forced_removal_of_never_cloned_bundle_succeeds() {
    let root = TestRoot::new();
    root.vbm()
        .args(["rm", "kamichidu/vim-hariti", "--force"])
        .assert()
        .success();
}

#[test]
fn test_removal_of_local_bundle_only_disables() {
    let root = TestRoot::new();
    let plugin = root.plugin_dir("precious-plugin");
    let reference = plugin.to_str().unwrap();

    root.vbm().args(["enable", reference]).assert().success();
    root.vbm()
        .args(["rm", reference, "--force"])
        .assert()
        .success();

    assert!(plugin.exists(), "local directory must never be deleted");
    assert!(std::fs::symlink_metadata(root.deploy_entry("precious-plugin")).is_err());
}
