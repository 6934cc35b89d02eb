#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const ADMIN_EMAIL: &str = "admin@school.id";
pub const ADMIN_PASSWORD: &str = "secret123";

pub fn rc() -> Command {
    cargo_bin_cmd!("rollcall")
}

/// Create a unique test DB path inside the system temp dir and remove any
/// leftover database or session file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rollcall.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    fs::remove_file(format!("{db_path}.session.json")).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rollcall_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

pub fn init_db(db_path: &str) {
    rc().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Fresh database with an admin account that is signed in
pub fn init_signed_in(db_path: &str) {
    init_db(db_path);

    rc().args([
        "--db",
        db_path,
        "register",
        "--name",
        "Admin",
        "--email",
        ADMIN_EMAIL,
        "--password",
        ADMIN_PASSWORD,
        "--confirm",
        ADMIN_PASSWORD,
    ])
    .assert()
    .success();

    rc().args([
        "--db",
        db_path,
        "login",
        "--email",
        ADMIN_EMAIL,
        "--password",
        ADMIN_PASSWORD,
    ])
    .assert()
    .success();
}

/// Signed-in database with class X, department RPL, section 1 and two
/// students: Budi (card A1B2C3D4) and Siti (no card)
pub fn init_school(db_path: &str) {
    init_signed_in(db_path);

    for (kind, name) in [("class", "X"), ("dept", "RPL"), ("section", "1")] {
        rc().args(["--db", db_path, kind, "add", name])
            .assert()
            .success();
    }

    rc().args([
        "--db",
        db_path,
        "student",
        "add",
        "--name",
        "Budi Santoso",
        "--nis",
        "1001",
        "--rfid",
        "a1b2c3d4",
        "--class",
        "X",
        "--dept",
        "RPL",
        "--section",
        "1",
    ])
    .assert()
    .success();

    rc().args([
        "--db",
        db_path,
        "student",
        "add",
        "--name",
        "Siti Aminah",
        "--nis",
        "1002",
        "--class",
        "X",
    ])
    .assert()
    .success();
}

pub fn tap(db_path: &str, uid: &str, at: &str) -> assert_cmd::assert::Assert {
    rc().args(["--db", db_path, "tap", uid, "--at", at]).assert()
}
