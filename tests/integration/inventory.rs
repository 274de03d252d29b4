//! `vbm list` reconstruction from the filesystem.

use crate::common::TestRoot;
use predicates::prelude::*;

// Percent-encoded form of https://github.com/kamichidu/vim-hariti.
const ENCODED: &str = "https%3A%2F%2Fgithub.com%2Fkamichidu%2Fvim-hariti";

#[test]
fn test_list_on_empty_root_prints_header_only() {
    let root = TestRoot::new();
    let assert = root.vbm().arg("list").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout.lines().count(), 1, "stdout: {stdout}");
    assert!(stdout.starts_with("Kind"));
}

#[test]
fn test_list_decodes_checkout_directory_names() {
    let root = TestRoot::new();
    root.seed_checkout(ENCODED);

    root.vbm()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "https://github.com/kamichidu/vim-hariti",
        ))
        .stdout(predicate::str::contains("vim-hariti"))
        .stdout(predicate::str::contains("Remote"));
}

#[test]
fn test_list_reports_enabled_locals_without_double_counting_remotes() {
    let root = TestRoot::new();
    root.seed_checkout(ENCODED);

    // Enable both the remote and a local bundle.
    root.vbm()
        .args(["enable", "kamichidu/vim-hariti"])
        .assert()
        .success();
    let plugin = root.plugin_dir("my-plugin");
    root.vbm()
        .args(["enable", plugin.to_str().unwrap()])
        .assert()
        .success();

    let assert = root.vbm().arg("list").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();

    // Header plus exactly one Remote and one Local row.
    assert_eq!(stdout.lines().count(), 3, "stdout: {stdout}");
    assert_eq!(stdout.matches("Remote").count(), 1);
    assert_eq!(stdout.matches("Local").count(), 1);
    assert!(stdout.contains("my-plugin"));
}
