//! Integration tests for the trip binary.
//!
//! These tests drive the CLI end to end against a temporary data directory:
//! - Itinerary lifecycle (add, edit, tags, favorites, search, delete)
//! - Packing lists and expenses
//! - Markdown and CSV exports

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// The binary with its data dir set and config lookups kept inside it
fn cli(data_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("trip"));
    cmd.env("XDG_CONFIG_HOME", data_dir.join("xdg"))
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

/// Run a command and pull the new record ID out of "... ID: <id>"
fn created_id(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    let stdout = String::from_utf8(output).unwrap();
    stdout
        .trim()
        .rsplit("ID: ")
        .next()
        .expect("no ID in output")
        .to_string()
}

fn add_trip(data_dir: &Path, name: &str) -> String {
    created_id(cli(data_dir).args([
        "itinerary",
        "add",
        "--name",
        name,
        "--start",
        "2024-07-01",
        "--end",
        "2024-07-09",
        "--description",
        "Hut to hut hiking",
    ]))
}

#[test]
fn test_cli_help() {
    Command::new(assert_cmd::cargo::cargo_bin!("trip"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Travel itinerary planner"));
}

#[test]
fn test_add_itinerary_persists_json() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    let id = add_trip(data_dir, "Alps");
    assert!(id.starts_with("itn_"));

    let json = fs::read_to_string(data_dir.join("itineraries.json")).unwrap();
    let records: serde_json::Value = serde_json::from_str(&json).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], id.as_str());
    assert_eq!(records[0]["name"], "Alps");
    assert_eq!(records[0]["is_favorite"], false);

    cli(data_dir)
        .args(["itinerary", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(&id))
        .stdout(predicate::str::contains("Alps"));
}

#[test]
fn test_malformed_dates_rejected() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args([
            "itinerary", "add", "--name", "Bad", "--start", "07/01/2024", "--end", "2024-07-09",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"));

    assert!(!data_dir.join("itineraries.json").exists());
}

#[test]
fn test_reversed_dates_warn_but_save() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args([
            "itinerary", "add", "--name", "Backwards", "--start", "2024-07-09", "--end",
            "2024-07-01",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("before it starts"));

    cli(data_dir)
        .args(["itinerary", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Backwards"));
}

#[test]
fn test_tags_favorites_and_search() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    let alps = add_trip(data_dir, "Alps");
    let rome = add_trip(data_dir, "Rome");

    cli(data_dir)
        .args(["itinerary", "tag", &alps, "hiking"])
        .assert()
        .success()
        .stdout(predicate::str::contains("added"));
    cli(data_dir)
        .args(["itinerary", "tag", &alps, "Hiking"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already"));

    cli(data_dir)
        .args(["itinerary", "list", "--tag", "HIKING"])
        .assert()
        .success()
        .stdout(predicate::str::contains(&alps))
        .stdout(predicate::str::contains(&rome).not());

    cli(data_dir)
        .args(["itinerary", "favorite", &rome])
        .assert()
        .success();
    cli(data_dir)
        .args(["itinerary", "list", "--favorites"])
        .assert()
        .success()
        .stdout(predicate::str::contains(&rome))
        .stdout(predicate::str::contains(&alps).not());

    cli(data_dir)
        .args(["itinerary", "favorites"])
        .assert()
        .success()
        .stdout(predicate::str::contains("★"))
        .stdout(predicate::str::contains(&rome));

    cli(data_dir)
        .args(["itinerary", "search", "rom"])
        .assert()
        .success()
        .stdout(predicate::str::contains(&rome));
    cli(data_dir)
        .args(["itinerary", "search", "hut", "--keyword"])
        .assert()
        .success()
        .stdout(predicate::str::contains(&alps))
        .stdout(predicate::str::contains(&rome));
    cli(data_dir)
        .args(["itinerary", "search", "zzz"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No itineraries found."));
}

#[test]
fn test_edit_and_delete() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let id = add_trip(data_dir, "Alps");

    cli(data_dir)
        .args(["itinerary", "edit", &id, "--name", "Dolomites"])
        .assert()
        .success();
    cli(data_dir)
        .args(["itinerary", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# Dolomites"));

    cli(data_dir)
        .args(["itinerary", "delete", &id])
        .assert()
        .success();
    cli(data_dir)
        .args(["itinerary", "show", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_missing_itinerary_reports_not_found() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["itinerary", "favorite", "itn_0_missing0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Itinerary with ID 'itn_0_missing0' not found",
        ));
}

#[test]
fn test_packing_workflow() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let trip = add_trip(data_dir, "Alps");

    let boots = created_id(cli(data_dir).args(["pack", "add", &trip, "Boots", "-q", "2"]));
    assert!(boots.starts_with("pck_"));

    cli(data_dir)
        .args(["pack", "toggle", &boots])
        .assert()
        .success()
        .stdout(predicate::str::contains("marked as packed"));
    cli(data_dir)
        .args(["pack", "list", &trip])
        .assert()
        .success()
        .stdout(predicate::str::contains("[x] 2x Boots"));

    cli(data_dir)
        .args(["pack", "toggle", &boots])
        .assert()
        .success()
        .stdout(predicate::str::contains("marked as unpacked"));

    cli(data_dir)
        .args(["pack", "add", &trip, "Map", "--quantity", "0"])
        .assert()
        .failure();

    cli(data_dir)
        .args(["pack", "remove", &boots])
        .assert()
        .success();
    cli(data_dir)
        .args(["pack", "list", &trip])
        .assert()
        .success()
        .stdout(predicate::str::contains("No packing items found"));
}

#[test]
fn test_expense_summary() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let trip = add_trip(data_dir, "Alps");

    for (amount, category) in [("10", "Food"), ("5.5", "Food"), ("20", "Travel")] {
        cli(data_dir)
            .args(["expense", "add", &trip, amount, category, "--date", "2024-07-02"])
            .assert()
            .success();
    }

    cli(data_dir)
        .args(["expense", "summary", &trip])
        .assert()
        .success()
        .stdout(predicate::str::contains("Food: 15.50"))
        .stdout(predicate::str::contains("Travel: 20.00"))
        .stdout(predicate::str::contains("Total: 35.50"));

    cli(data_dir)
        .args(["expense", "add", &trip, "-3", "Food"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"));
}

#[test]
fn test_expense_date_defaults_to_today() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    let id = created_id(cli(data_dir).args(["expense", "add", "itn_x", "12.5", "Food"]));

    let json = fs::read_to_string(data_dir.join("expenses.json")).unwrap();
    let records: serde_json::Value = serde_json::from_str(&json).unwrap();
    let date = records[0]["date"].as_str().unwrap();
    assert_eq!(records[0]["id"], id.as_str());
    assert_eq!(date.len(), 10);
    assert_eq!(&date[4..5], "-");
}

#[test]
fn test_export_markdown_and_csv() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let export_dir = temp_dir.path().join("out");
    let trip = add_trip(data_dir, "Alps Hike");

    cli(data_dir)
        .args(["pack", "add", &trip, "Socks, wool", "-q", "3"])
        .assert()
        .success();

    cli(data_dir)
        .arg("--export-dir")
        .arg(&export_dir)
        .args(["export", "packing", &trip, "--format", "md"])
        .assert()
        .success();
    let md = fs::read_to_string(export_dir.join("Alps_Hike_packing.md")).unwrap();
    assert!(md.starts_with("# Packing List for Alps Hike"));
    assert!(md.contains("- [ ] 3x Socks, wool (ID: "));

    cli(data_dir)
        .arg("--export-dir")
        .arg(&export_dir)
        .args(["export", "packing", &trip, "--format", "csv"])
        .assert()
        .success();
    let csv = fs::read_to_string(export_dir.join("Alps_Hike_packing.csv")).unwrap();
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines[0], "ID,Name,Quantity,Packed");
    assert!(lines[1].ends_with(",\"Socks, wool\",3,No"));
}

#[test]
fn test_export_default_dir_and_bad_format() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let trip = add_trip(data_dir, "Alps");

    cli(data_dir)
        .args(["export", "itinerary", &trip])
        .assert()
        .success();
    assert!(data_dir.join("exports/Alps_itinerary.md").exists());

    cli(data_dir)
        .args(["export", "itinerary", &trip, "--format", "pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown export format 'pdf'"));

    cli(data_dir)
        .args(["export", "receipts", &trip])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown export type 'receipts'"));

    cli(data_dir)
        .args(["export", "expenses", "itn_0_nothere0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_config_file_sets_export_dir() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let export_dir = data_dir.join("from-config");
    let trip = add_trip(data_dir, "Alps");

    let config_dir = data_dir.join("xdg/trip-planner");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        format!("[export]\nexport_dir = {:?}\n", export_dir.to_str().unwrap()),
    )
    .unwrap();

    cli(data_dir)
        .args(["export", "expenses", &trip, "--format", "csv"])
        .assert()
        .success();

    assert!(export_dir.join("Alps_expenses.csv").exists());
    assert!(!data_dir.join("exports").exists());
}
