//! Alias and dependency persistence through the CLI.

use crate::common::TestRoot;
use predicates::prelude::*;

#[test]
fn test_alias_add_remove_clear_roundtrip() {
    let root = TestRoot::new();

    root.vbm()
        .args(["alias", "add", "kamichidu/vim-hariti", "hariti", "vh"])
        .assert()
        .success();

    let doc = std::fs::read_to_string(root.meta_doc("vim-hariti")).unwrap();
    assert!(doc.contains("hariti") && doc.contains("vh"), "doc: {doc}");

    root.vbm()
        .args(["alias", "rm", "kamichidu/vim-hariti", "hariti"])
        .assert()
        .success();
    let doc = std::fs::read_to_string(root.meta_doc("vim-hariti")).unwrap();
    assert!(!doc.contains("hariti"), "doc: {doc}");
    assert!(doc.contains("vh"));

    root.vbm()
        .args(["alias", "clear", "kamichidu/vim-hariti"])
        .assert()
        .success();
    let doc = std::fs::read_to_string(root.meta_doc("vim-hariti")).unwrap();
    assert!(!doc.contains("aliases"), "doc: {doc}");
}

#[test]
fn test_dependency_stored_by_canonical_url() {
    let root = TestRoot::new();

    // Bare name normalizes to the vim-scripts mirror before storage.
    root.vbm()
        .args(["dependency", "add", "x/top", "surround.vim"])
        .assert()
        .success();

    let doc = std::fs::read_to_string(root.meta_doc("top")).unwrap();
    assert!(
        doc.contains("https://github.com/vim-scripts/surround.vim"),
        "doc: {doc}"
    );

    root.vbm()
        .args(["dependency", "rm", "x/top", "surround.vim"])
        .assert()
        .success();
    let doc = std::fs::read_to_string(root.meta_doc("top")).unwrap();
    assert!(!doc.contains("surround.vim"), "doc: {doc}");
}

#[test]
fn test_dependency_cycle_is_refused() {
    let root = TestRoot::new();

    root.vbm()
        .args(["dependency", "add", "x/a", "x/b"])
        .assert()
        .success();
    root.vbm()
        .args(["dependency", "add", "x/b", "x/a"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cycle"));

    // The refused edge was not written.
    assert!(!root.meta_doc("b").exists());
}

#[test]
fn test_overlay_survives_independent_resolution() {
    let root = TestRoot::new();

    root.vbm()
        .args(["alias", "add", "kamichidu/vim-hariti", "hariti"])
        .assert()
        .success();

    // A separate invocation re-resolves from scratch and still sees the
    // alias once the checkout exists for list to find.
    root.seed_checkout("https%3A%2F%2Fgithub.com%2Fkamichidu%2Fvim-hariti");
    root.vbm()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("hariti"));
}
