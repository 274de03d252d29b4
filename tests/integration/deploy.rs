//! Enable/disable flows through the CLI.

use crate::common::TestRoot;
use predicates::prelude::*;

#[test]
fn test_enable_twice_leaves_one_link() {
    let root = TestRoot::new();
    let plugin = root.plugin_dir("my-plugin");
    let reference = plugin.to_str().unwrap();

    root.vbm().args(["enable", reference]).assert().success();
    root.vbm().args(["enable", reference]).assert().success();

    let entry = root.deploy_entry("my-plugin");
    let meta = std::fs::symlink_metadata(&entry).expect("deploy entry exists");
    assert!(meta.file_type().is_symlink());
    assert_eq!(
        std::fs::canonicalize(&entry).unwrap(),
        std::fs::canonicalize(&plugin).unwrap()
    );
}

#[test]
fn test_disable_twice_is_noop_success() {
    let root = TestRoot::new();
    let plugin = root.plugin_dir("my-plugin");
    let reference = plugin.to_str().unwrap();

    root.vbm().args(["enable", reference]).assert().success();
    root.vbm().args(["disable", reference]).assert().success();
    assert!(std::fs::symlink_metadata(root.deploy_entry("my-plugin")).is_err());

    // Absent entry: still a success.
    root.vbm().args(["disable", reference]).assert().success();
}

#[test]
fn test_enable_conflict_fails_and_preserves_squatter() {
    let root = TestRoot::new();
    let plugin = root.plugin_dir("my-plugin");

    let squatter = root.deploy_entry("my-plugin");
    std::fs::create_dir_all(&squatter).unwrap();
    std::fs::write(squatter.join("precious"), "keep me").unwrap();

    root.vbm()
        .args(["enable", plugin.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("in the way"));

    assert_eq!(
        std::fs::read_to_string(squatter.join("precious")).unwrap(),
        "keep me"
    );
}

#[test]
fn test_enable_when_stores_expression() {
    let root = TestRoot::new();
    let plugin = root.plugin_dir("guarded");

    root.vbm()
        .args(["enable", plugin.to_str().unwrap(), "--when", "has('nvim')"])
        .assert()
        .success();

    let doc = std::fs::read_to_string(root.meta_doc("guarded")).unwrap();
    assert!(doc.contains(r#""enableIf":"has('nvim')""#), "doc: {doc}");
    assert!(std::fs::symlink_metadata(root.deploy_entry("guarded")).is_ok());
}

#[test]
fn test_enable_rejects_empty_expression() {
    let root = TestRoot::new();
    let plugin = root.plugin_dir("guarded");

    root.vbm()
        .args(["enable", plugin.to_str().unwrap(), "--when", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must not be empty"));
}

#[test]
fn test_resolution_error_reports_reference() {
    let root = TestRoot::new();
    root.vbm()
        .args(["enable", "not/a/valid/reference"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not/a/valid/reference"));
}
