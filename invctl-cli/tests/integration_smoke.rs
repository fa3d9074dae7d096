//! Smoke tests to verify command module wiring
//!
//! Help-text only; nothing here touches a database.

use assert_cmd::Command;
use predicates::prelude::*;

// === Top-level ===

#[test]
fn test_help_lists_core_subcommands() {
    let mut cmd = Command::cargo_bin("invctl").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("backup"))
        .stdout(predicate::str::contains("restore"))
        .stdout(predicate::str::contains("optimize"))
        .stdout(predicate::str::contains("stats"));
}

// === Ops Command Tests ===

#[test]
fn test_backup_help() {
    let mut cmd = Command::cargo_bin("invctl").unwrap();
    cmd.arg("backup").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Directory to write the backup"));
}

#[test]
fn test_restore_help() {
    let mut cmd = Command::cargo_bin("invctl").unwrap();
    cmd.arg("restore").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("backup file produced by"));
}

#[test]
fn test_restore_requires_path() {
    let mut cmd = Command::cargo_bin("invctl").unwrap();
    cmd.arg("restore");

    cmd.assert().failure();
}

#[test]
fn test_stats_help() {
    let mut cmd = Command::cargo_bin("invctl").unwrap();
    cmd.arg("stats").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("JSON"));
}

// === Product Command Tests ===

#[test]
fn test_product_list_help() {
    let mut cmd = Command::cargo_bin("invctl").unwrap();
    cmd.arg("product").arg("list").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("category"));
}

#[test]
fn test_product_add_help() {
    let mut cmd = Command::cargo_bin("invctl").unwrap();
    cmd.arg("product").arg("add").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Stock keeping unit"));
}

#[test]
fn test_product_low_stock_help() {
    let mut cmd = Command::cargo_bin("invctl").unwrap();
    cmd.arg("product").arg("low-stock").arg("--help");

    cmd.assert().success();
}

// === Supplier Command Tests ===

#[test]
fn test_supplier_update_help() {
    let mut cmd = Command::cargo_bin("invctl").unwrap();
    cmd.arg("supplier").arg("update").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Activate or deactivate"));
}

// === Order Command Tests ===

#[test]
fn test_order_create_help() {
    let mut cmd = Command::cargo_bin("invctl").unwrap();
    cmd.arg("order").arg("create").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("SKU:QTY:PRICE"));
}

#[test]
fn test_order_create_rejects_bad_item_spec() {
    let mut cmd = Command::cargo_bin("invctl").unwrap();
    cmd.arg("order")
        .arg("create")
        .arg("--supplier")
        .arg("1")
        .arg("--item")
        .arg("not-a-spec");

    cmd.assert().failure();
}

#[test]
fn test_order_receive_help() {
    let mut cmd = Command::cargo_bin("invctl").unwrap();
    cmd.arg("order").arg("receive").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("receive in full"));
}

// === Completions ===

#[test]
fn test_completions_bash() {
    let mut cmd = Command::cargo_bin("invctl").unwrap();
    cmd.arg("completions").arg("bash");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("invctl"));
}
