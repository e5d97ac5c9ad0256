//! Integration tests for the ficelle CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get a ficelle command isolated from the user's config and env
fn ficelle(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ficelle").unwrap();
    cmd.current_dir(tmp.path())
        .env("XDG_CONFIG_HOME", tmp.path().join("xdg"))
        .env("HOME", tmp.path())
        .env_remove("FICELLE_HOURLY_RATE")
        .env_remove("FICELLE_CURRENCY")
        .env_remove("FICELLE_LOG");
    cmd
}

/// Helper to create a test inventory in a temp directory
fn setup_inventory() -> TempDir {
    let tmp = TempDir::new().unwrap();
    ficelle(&tmp).arg("init").assert().success();
    tmp
}

/// Helper to record a lot and return its short id
fn add_lot(tmp: &TempDir, material: &str, length: &str, count: &str, price: &str) -> String {
    let output = ficelle(tmp)
        .args([
            "lot", "add", "--type", "Laine", "--material", material, "--length", length,
            "--count", count, "--price", price, "--format", "id",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn status_json(tmp: &TempDir) -> serde_json::Value {
    let output = ficelle(tmp)
        .args(["status", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

fn assert_close(actual: &serde_json::Value, expected: f64) {
    let actual = actual.as_f64().unwrap();
    assert!((actual - expected).abs() < 1e-9, "{} != {}", actual, expected);
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    let tmp = TempDir::new().unwrap();
    ficelle(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("thread"))
        .stdout(predicate::str::contains("lot"))
        .stdout(predicate::str::contains("wish"));
}

#[test]
fn test_version_displays() {
    let tmp = TempDir::new().unwrap();
    ficelle(&tmp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ficelle"));
}

#[test]
fn test_completions_generate() {
    let tmp = TempDir::new().unwrap();
    ficelle(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ficelle"));
}

// ============================================================================
// Init Tests
// ============================================================================

#[test]
fn test_init_creates_inventory() {
    let tmp = TempDir::new().unwrap();
    ficelle(&tmp)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized thread inventory"));

    assert!(tmp.path().join(".ficelle").is_dir());
    assert!(tmp.path().join(".ficelle/config.yaml").is_file());
    assert!(tmp.path().join(".ficelle/inventory.db").is_file());
}

#[test]
fn test_init_twice_warns() {
    let tmp = setup_inventory();
    ficelle(&tmp)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_force_init_keeps_data_and_config() {
    let tmp = setup_inventory();
    add_lot(&tmp, "Alpaga", "100", "1", "10");
    fs::write(tmp.path().join(".ficelle/config.yaml"), "hourly_rate: 30\n").unwrap();
    ficelle(&tmp).args(["init", "--force"]).assert().success();

    ficelle(&tmp)
        .args(["lot", "list", "--count"])
        .assert()
        .success()
        .stdout("1\n");

    ficelle(&tmp)
        .args(["config", "show", "hourly_rate"])
        .assert()
        .success()
        .stdout("30\n");
}

#[test]
fn test_commands_outside_inventory_fail() {
    let tmp = TempDir::new().unwrap();
    ficelle(&tmp)
        .args(["lot", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a ficelle inventory"));
}

// ============================================================================
// Lot Tests
// ============================================================================

#[test]
fn test_lot_add_and_show() {
    let tmp = setup_inventory();
    ficelle(&tmp)
        .args([
            "lot", "add", "--type", "Laine", "--material", "Alpaga", "--color", "#334455",
            "--length", "100", "--count", "2", "--price", "20", "--source", "Drops",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded lot LOT@1"))
        .stdout(predicate::str::contains("200.00 m"));

    ficelle(&tmp)
        .args(["lot", "show", "LOT@1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alpaga"))
        .stdout(predicate::str::contains("200.00 m of 200.00 m"))
        .stdout(predicate::str::contains("Drops"));
}

#[test]
fn test_lot_add_requires_length() {
    let tmp = setup_inventory();
    ficelle(&tmp)
        .args(["lot", "add", "--type", "Laine", "--material", "Alpaga"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--length"));
}

#[test]
fn test_lot_add_rejects_negative_price() {
    let tmp = setup_inventory();
    ficelle(&tmp)
        .args([
            "lot", "add", "--type", "Laine", "--material", "Alpaga", "--length", "50",
            "--price=-3",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid price"))
        .stderr(predicate::str::contains("ficelle::validation"));

    ficelle(&tmp)
        .args(["lot", "list", "--count"])
        .assert()
        .success()
        .stdout("0\n");
}

#[test]
fn test_lot_show_unknown_fails() {
    let tmp = setup_inventory();
    ficelle(&tmp)
        .args(["lot", "show", "LOT@9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("LOT@9 not found"))
        .stderr(predicate::str::contains("ficelle::not_found"));

    ficelle(&tmp)
        .args(["lot", "photo", "LOT@9", "--output"])
        .arg(tmp.path().join("missing.jpg"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("ficelle::not_found"));
}

#[test]
fn test_lot_list_filters() {
    let tmp = setup_inventory();
    add_lot(&tmp, "Alpaga", "100", "1", "10");
    add_lot(&tmp, "Merinos", "10", "1", "5");
    ficelle(&tmp).args(["use", "LOT@2", "10"]).assert().success();

    ficelle(&tmp)
        .args(["lot", "list", "--search", "alp", "--format", "id"])
        .assert()
        .success()
        .stdout("LOT@1\n");

    ficelle(&tmp)
        .args(["lot", "list", "--available", "--format", "id"])
        .assert()
        .success()
        .stdout("LOT@1\n");

    ficelle(&tmp)
        .args(["lot", "list", "--low", "--format", "id"])
        .assert()
        .success()
        .stdout("LOT@2\n");
}

#[test]
fn test_lot_list_json_omits_photo_bytes() {
    let tmp = setup_inventory();
    let photo = tmp.path().join("texture.png");
    fs::write(&photo, [0x89, b'P', b'N', b'G']).unwrap();

    ficelle(&tmp)
        .args(["lot", "add", "--type", "Coton", "--material", "Mercerise", "--length", "50"])
        .arg("--photo")
        .arg(&photo)
        .assert()
        .success();

    let output = ficelle(&tmp)
        .args(["lot", "list", "--format", "json"])
        .output()
        .unwrap();
    let lots: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(lots[0]["type"], "Coton");
    assert!(lots[0].get("photo").is_none());
}

#[test]
fn test_lot_photo_export() {
    let tmp = setup_inventory();
    let photo = tmp.path().join("texture.png");
    let bytes = [0x89, b'P', b'N', b'G', 0x0d, 0x0a];
    fs::write(&photo, bytes).unwrap();

    ficelle(&tmp)
        .args(["lot", "add", "--type", "Soie", "--material", "Tussah", "--length", "80"])
        .arg("--photo")
        .arg(&photo)
        .assert()
        .success();

    let exported = tmp.path().join("out.png");
    ficelle(&tmp)
        .args(["lot", "photo", "LOT@1", "--output"])
        .arg(&exported)
        .assert()
        .success()
        .stdout(predicate::str::contains("6 bytes"));
    assert_eq!(fs::read(&exported).unwrap(), bytes);
}

#[test]
fn test_lot_photo_missing_fails() {
    let tmp = setup_inventory();
    add_lot(&tmp, "Alpaga", "100", "1", "10");
    ficelle(&tmp)
        .args(["lot", "photo", "LOT@1", "--output", "out.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("has no photo"));
}

// ============================================================================
// Consumption Tests
// ============================================================================

#[test]
fn test_use_decrements_and_rejects_overdraw() {
    let tmp = setup_inventory();
    let lot = add_lot(&tmp, "Alpaga", "100", "2", "20");
    assert_eq!(lot, "LOT@1");

    ficelle(&tmp)
        .args(["use", "LOT@1", "50", "--project", "Pull rouge"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Used 50.00 m from LOT@1 (150.00 m left)"));

    ficelle(&tmp)
        .args(["use", "LOT@1", "160"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not enough thread on LOT@1"));

    let status = status_json(&tmp);
    assert_close(&status["total_remaining_m"], 150.0);
    assert_close(&status["total_consumed_m"], 50.0);

    let output = ficelle(&tmp)
        .args(["history", "--format", "json"])
        .output()
        .unwrap();
    let history: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["project"], "Pull rouge");
}

#[test]
fn test_use_in_centimeters() {
    let tmp = setup_inventory();
    add_lot(&tmp, "Alpaga", "100", "2", "20");

    ficelle(&tmp)
        .args(["use", "1", "250", "--unit", "cm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Used 2.50 m"));

    let status = status_json(&tmp);
    assert_close(&status["total_remaining_m"], 197.5);
}

#[test]
fn test_use_entire_lot_then_nothing_more() {
    let tmp = setup_inventory();
    add_lot(&tmp, "Lin", "30", "1", "6");

    ficelle(&tmp).args(["use", "LOT@1", "30"]).assert().success();
    ficelle(&tmp)
        .args(["use", "LOT@1", "0.01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not enough thread"));
}

#[test]
fn test_use_zero_is_invalid() {
    let tmp = setup_inventory();
    add_lot(&tmp, "Lin", "30", "1", "6");
    ficelle(&tmp)
        .args(["use", "LOT@1", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid amount"));
}

#[test]
fn test_use_unknown_lot_fails() {
    let tmp = setup_inventory();
    ficelle(&tmp)
        .args(["use", "LOT@4", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("LOT@4 not found"));
}

#[test]
fn test_history_for_one_lot() {
    let tmp = setup_inventory();
    add_lot(&tmp, "Alpaga", "100", "1", "10");
    add_lot(&tmp, "Merinos", "100", "1", "10");
    ficelle(&tmp).args(["use", "LOT@1", "5"]).assert().success();
    ficelle(&tmp).args(["use", "LOT@2", "7"]).assert().success();
    ficelle(&tmp).args(["use", "LOT@2", "3"]).assert().success();

    ficelle(&tmp)
        .args(["history", "--lot", "LOT@2", "--format", "id"])
        .assert()
        .success()
        .stdout("USE@2\nUSE@3\n");
}

// ============================================================================
// Dashboard Tests
// ============================================================================

#[test]
fn test_alerts_lists_low_lots() {
    let tmp = setup_inventory();
    add_lot(&tmp, "Alpaga", "100", "1", "10");
    add_lot(&tmp, "Merinos", "10", "1", "5");

    ficelle(&tmp)
        .arg("alerts")
        .assert()
        .success()
        .stdout(predicate::str::contains("All stock levels are fine"));

    ficelle(&tmp).args(["use", "LOT@2", "6"]).assert().success();

    ficelle(&tmp)
        .arg("alerts")
        .assert()
        .success()
        .stdout(predicate::str::contains("LOT@2"))
        .stdout(predicate::str::contains("4.00 m left"))
        .stdout(predicate::str::contains("LOT@1").not());
}

#[test]
fn test_alerts_threshold_from_config() {
    let tmp = setup_inventory();
    fs::write(
        tmp.path().join(".ficelle/config.yaml"),
        "low_stock_absolute: 200\n",
    )
    .unwrap();
    add_lot(&tmp, "Alpaga", "100", "1", "10");

    ficelle(&tmp)
        .args(["alerts", "--format", "id"])
        .assert()
        .success()
        .stdout("LOT@1\n");
}

#[test]
fn test_status_json_metrics() {
    let tmp = setup_inventory();
    add_lot(&tmp, "Alpaga", "100", "2", "20");
    add_lot(&tmp, "Merinos", "50", "1", "8.5");
    ficelle(&tmp).args(["use", "LOT@1", "20"]).assert().success();

    let status = status_json(&tmp);
    assert_eq!(status["lot_count"], 2);
    assert_close(&status["total_remaining_m"], 230.0);
    assert_close(&status["total_value"], 28.5);
    assert_close(&status["total_consumed_m"], 20.0);
    assert_eq!(status["materials"][0]["material"], "Alpaga");
    assert_eq!(status["low_stock"].as_array().unwrap().len(), 0);
}

#[test]
fn test_status_empty_inventory() {
    let tmp = setup_inventory();
    ficelle(&tmp)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Thread left"))
        .stdout(predicate::str::contains("0.00 m"));
}

// ============================================================================
// Price Tests
// ============================================================================

#[test]
fn test_price_suggestion() {
    let tmp = TempDir::new().unwrap();
    ficelle(&tmp)
        .args(["price", "--hours", "4", "--rate", "15", "--material", "10", "--margin", "20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("70.00"))
        .stdout(predicate::str::contains("84.00"))
        .stdout(predicate::str::contains("Premium").not());
}

#[test]
fn test_price_uses_config_rate_and_flags_premium() {
    let tmp = setup_inventory();
    fs::write(tmp.path().join(".ficelle/config.yaml"), "hourly_rate: 30\n").unwrap();

    ficelle(&tmp)
        .args(["price", "--hours", "4", "--format", "tsv"])
        .assert()
        .success()
        .stdout("144.00\n");

    ficelle(&tmp)
        .args(["price", "--hours", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Premium"));
}

// ============================================================================
// Wishlist Tests
// ============================================================================

#[test]
fn test_wish_add_list_remove() {
    let tmp = setup_inventory();
    ficelle(&tmp)
        .args(["wish", "add", "Mohair soie", "--color", "ocre", "--priority", "urgent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("WISH@1"));

    ficelle(&tmp)
        .args(["wish", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mohair soie"))
        .stdout(predicate::str::contains("urgent"))
        .stdout(predicate::str::contains("to_buy"));

    ficelle(&tmp)
        .args(["wish", "remove", "WISH@1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed WISH@1"));

    ficelle(&tmp)
        .args(["wish", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wishlist is empty"));
}

#[test]
fn test_wish_remove_missing_is_not_an_error() {
    let tmp = setup_inventory();
    ficelle(&tmp)
        .args(["wish", "remove", "WISH@42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to remove"));
}

#[test]
fn test_wish_add_empty_product_fails() {
    let tmp = setup_inventory();
    ficelle(&tmp)
        .args(["wish", "add", "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid product"));
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_config_show_key() {
    let tmp = setup_inventory();
    ficelle(&tmp)
        .args(["config", "show", "margin_pct"])
        .assert()
        .success()
        .stdout("20\n");

    ficelle(&tmp)
        .env("FICELLE_CURRENCY", "CHF")
        .args(["config", "show", "currency"])
        .assert()
        .success()
        .stdout("CHF\n");
}

#[test]
fn test_config_path_mentions_inventory() {
    let tmp = setup_inventory();
    ficelle(&tmp)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".ficelle"));
}

#[test]
fn test_explicit_root_flag() {
    let tmp = setup_inventory();
    add_lot(&tmp, "Alpaga", "100", "1", "10");
    let elsewhere = TempDir::new().unwrap();

    let mut cmd = ficelle(&elsewhere);
    cmd.args(["lot", "list", "--count", "--root"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout("1\n");
}
