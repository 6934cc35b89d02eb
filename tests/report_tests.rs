use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;

mod common;
use common::{init_school, rc, setup_test_db, tap, temp_out};

fn seed(db_path: &str) {
    init_school(db_path);
    tap(db_path, "A1B2C3D4", "2025-07-31 07:00:00").success();
    tap(db_path, "A1B2C3D4", "2025-08-18 07:05:00").success();
    tap(db_path, "A1B2C3D4", "2025-08-18 13:30:00").success();
    rc().args([
        "--db", db_path, "attendance", "add", "1002", "--date", "2025-08-18", "--status",
        "alpha",
    ])
    .assert()
    .success();
}

#[test]
fn test_report_by_month() {
    let db_path = setup_test_db("report_month");
    seed(&db_path);

    rc().args(["--db", &db_path, "report", "--range", "2025-08"])
        .assert()
        .success()
        .stdout(
            contains("Attendance report 2025-08")
                .and(contains("Total: 2"))
                .and(contains("Absent: 1"))
                .and(contains("13:30:00"))
                .and(contains("2025-07-31").not()),
        );

    rc().args(["--db", &db_path, "report", "--range", "2025-07:2025-08", "--status", "absent"])
        .assert()
        .success()
        .stdout(contains("Siti Aminah").and(contains("Total: 1")));
}

#[test]
fn test_report_export_csv() {
    let db_path = setup_test_db("report_csv");
    seed(&db_path);
    let out = temp_out("report_csv", "csv");

    rc().args([
        "--db", &db_path, "report", "--range", "2025-08-18", "--export", "csv", "--file", &out,
    ])
    .assert()
    .success()
    .stdout(contains("CSV export completed"));

    let content = fs::read_to_string(&out).expect("read csv");
    let mut lines = content.lines();
    assert_eq!(
        lines.next(),
        Some("id,date,student,nis,class,department,section,check_in,check_out,status,note")
    );
    assert!(content.contains("Budi Santoso,1001,X,RPL,1,07:05:00,13:30:00,present,"));
    assert!(content.contains("Siti Aminah,1002,X,,,,,absent,"));
    assert_eq!(content.lines().count(), 3);
}

#[test]
fn test_report_export_json() {
    let db_path = setup_test_db("report_json");
    seed(&db_path);
    let out = temp_out("report_json", "json");

    rc().args(["--db", &db_path, "report", "--export", "json", "--file", &out])
        .assert()
        .success()
        .stdout(contains("JSON export completed"));

    let content = fs::read_to_string(&out).expect("read json");
    let rows: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    let rows = rows.as_array().expect("array");
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().any(|r| r["status"] == "absent" && r["nis"] == "1002"));
    // newest first
    assert_eq!(rows[2]["date"], "2025-07-31");
}

#[test]
fn test_export_requires_absolute_path_and_force() {
    let db_path = setup_test_db("report_paths");
    seed(&db_path);

    rc().args([
        "--db", &db_path, "report", "--export", "csv", "--file", "relative.csv",
    ])
    .assert()
    .failure()
    .stderr(contains("must be absolute"));

    let out = temp_out("report_force", "csv");
    fs::write(&out, "old").expect("seed file");

    rc().args(["--db", &db_path, "report", "--export", "csv", "--file", &out])
        .write_stdin("n\n")
        .assert()
        .failure()
        .stderr(contains("not overwritten"));
    assert_eq!(fs::read_to_string(&out).expect("read"), "old");

    rc().args([
        "--db", &db_path, "report", "--export", "csv", "--file", &out, "--force",
    ])
    .assert()
    .success();
    assert!(fs::read_to_string(&out).expect("read").starts_with("id,date"));
}

#[test]
fn test_export_without_file_is_rejected() {
    let db_path = setup_test_db("report_nofile");
    seed(&db_path);

    rc().args(["--db", &db_path, "report", "--export", "json"])
        .assert()
        .failure();
}

#[test]
fn test_stats() {
    let db_path = setup_test_db("report_stats");
    seed(&db_path);

    rc().args(["--db", &db_path, "stats"])
        .assert()
        .success()
        .stdout(
            contains("Students:")
                .and(contains("Attendance records:"))
                .and(contains("Database size:")),
        );
}
