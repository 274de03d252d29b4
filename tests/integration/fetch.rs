//! `vbm get` over local bundles, including failure isolation.

use crate::common::TestRoot;
use predicates::prelude::*;

#[test]
fn test_get_local_bundle_enables_by_default() {
    let root = TestRoot::new();
    let plugin = root.plugin_dir("my-plugin");

    root.vbm()
        .args(["get", plugin.to_str().unwrap()])
        .assert()
        .success();

    assert!(std::fs::symlink_metadata(root.deploy_entry("my-plugin")).is_ok());
}

#[test]
fn test_get_disabled_skips_the_link() {
    let root = TestRoot::new();
    let plugin = root.plugin_dir("my-plugin");

    root.vbm()
        .args(["get", plugin.to_str().unwrap(), "--disabled"])
        .assert()
        .success();

    assert!(std::fs::symlink_metadata(root.deploy_entry("my-plugin")).is_err());
}

#[test]
fn test_batch_get_isolates_failures_per_argument() {
    let root = TestRoot::new();
    let good = root.plugin_dir("good-plugin");

    // The bad reference fails on its own; the good one still lands.
    root.vbm()
        .args(["get", good.to_str().unwrap(), "not/a/valid/reference"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not/a/valid/reference"))
        .stdout(predicate::str::contains("good-plugin"));

    assert!(std::fs::symlink_metadata(root.deploy_entry("good-plugin")).is_ok());
}
