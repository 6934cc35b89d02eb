use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{init_school, init_signed_in, rc, setup_test_db};

#[test]
fn test_class_add_list_rename() {
    let db_path = setup_test_db("ref_class_crud");
    init_signed_in(&db_path);

    for name in ["XI", "X", "XII"] {
        rc().args(["--db", &db_path, "class", "add", name])
            .assert()
            .success()
            .stdout(contains(format!("Class '{name}' added")));
    }

    rc().args(["--db", &db_path, "class", "add", "x"])
        .assert()
        .failure()
        .stderr(contains("already exists"));

    let out = rc()
        .args(["--db", &db_path, "class", "list"])
        .output()
        .expect("run class list");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Class list (3)"));
    let x = stdout.find("\nX ").expect("X listed");
    let xi = stdout.find("\nXI ").expect("XI listed");
    let xii = stdout.find("\nXII ").expect("XII listed");
    assert!(x < xi && xi < xii, "classes ordered by name:\n{stdout}");

    rc().args(["--db", &db_path, "class", "rename", "XII", "XII-A"])
        .assert()
        .success()
        .stdout(contains("renamed to 'XII-A'"));

    rc().args(["--db", &db_path, "class", "list", "--search", "a"])
        .assert()
        .success()
        .stdout(contains("XII-A").and(contains("Class list (1)")));
}

#[test]
fn test_delete_refused_while_students_reference_it() {
    let db_path = setup_test_db("ref_in_use");
    init_school(&db_path);

    rc().args(["--db", &db_path, "class", "del", "X", "--yes"])
        .assert()
        .failure()
        .stderr(contains("still has 2 student(s)"));

    rc().args(["--db", &db_path, "dept", "list"])
        .assert()
        .success()
        .stdout(contains("RPL"));

    // Move Budi away from section 1, then it can go
    rc().args(["--db", &db_path, "student", "update", "1001", "--section", ""])
        .assert()
        .success();

    rc().args(["--db", &db_path, "section", "del", "1", "--yes"])
        .assert()
        .success()
        .stdout(contains("Section '1' deleted"));

    rc().args(["--db", &db_path, "section", "list"])
        .assert()
        .success()
        .stdout(contains("No sections found"));
}

#[test]
fn test_delete_unknown_entry() {
    let db_path = setup_test_db("ref_unknown");
    init_signed_in(&db_path);

    rc().args(["--db", &db_path, "dept", "del", "TKJ", "--yes"])
        .assert()
        .failure()
        .stderr(contains("Department 'TKJ' not found"));
}

#[test]
fn test_delete_cancelled_without_confirmation() {
    let db_path = setup_test_db("ref_cancel");
    init_signed_in(&db_path);

    rc().args(["--db", &db_path, "class", "add", "X"])
        .assert()
        .success();

    rc().args(["--db", &db_path, "class", "del", "X"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("Operation cancelled"));

    rc().args(["--db", &db_path, "class", "list"])
        .assert()
        .success()
        .stdout(contains("Class list (1)"));
}
