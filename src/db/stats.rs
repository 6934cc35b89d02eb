use crate::db::pool::DbPool;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;
use std::fs;

/// Exact row counts shown on the settings/statistics screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DbCounts {
    pub students: i64,
    pub classes: i64,
    pub departments: i64,
    pub sections: i64,
    pub attendance: i64,
    pub users: i64,
}

fn count(conn: &Connection, table: &str) -> rusqlite::Result<i64> {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })
}

pub fn load_counts(conn: &Connection) -> rusqlite::Result<DbCounts> {
    Ok(DbCounts {
        students: count(conn, "students")?,
        classes: count(conn, "classes")?,
        departments: count(conn, "departments")?,
        sections: count(conn, "sections")?,
        attendance: count(conn, "attendance")?,
        users: count(conn, "users")?,
    })
}

pub fn file_size_mb(db_path: &str) -> f64 {
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    (file_size as f64) / (1024.0 * 1024.0)
}

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_size_mb(db_path));

    //
    // 2) ROW COUNTS
    //
    let counts = load_counts(&pool.conn)?;
    for (label, n) in [
        ("Students", counts.students),
        ("Classes", counts.classes),
        ("Departments", counts.departments),
        ("Sections", counts.sections),
        ("Attendance records", counts.attendance),
        ("Admin accounts", counts.users),
    ] {
        println!("{}• {}:{} {}{}{}", CYAN, label, RESET, GREEN, n, RESET);
    }

    //
    // 3) DATE RANGE
    //
    let first_date: Option<String> = pool
        .conn
        .query_row("SELECT MIN(date) FROM attendance", [], |row| row.get(0))
        .optional()?
        .flatten();

    let last_date: Option<String> = pool
        .conn
        .query_row("SELECT MAX(date) FROM attendance", [], |row| row.get(0))
        .optional()?
        .flatten();

    let fmt_first = first_date.unwrap_or_else(|| format!("{GREY}--{RESET}"));
    let fmt_last = last_date.unwrap_or_else(|| format!("{GREY}--{RESET}"));

    println!("{}• Attendance range:{}", CYAN, RESET);
    println!("    from: {}", fmt_first);
    println!("    to:   {}", fmt_last);

    println!();
    Ok(())
}
