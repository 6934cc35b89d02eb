use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};
use tracing::debug;

/// Ensure that the `log` table exists: applied migrations are recorded there.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250812_0001_accounts",
        description: "Created users table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS users (
            id            TEXT PRIMARY KEY,
            email         TEXT NOT NULL UNIQUE,
            full_name     TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            created_at    TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20250812_0002_reference_tables",
        description: "Created classes, departments and sections tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS classes (
            id         TEXT PRIMARY KEY,
            name       TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS departments (
            id         TEXT PRIMARY KEY,
            name       TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS sections (
            id         TEXT PRIMARY KEY,
            name       TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20250812_0003_students",
        description: "Created students table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS students (
            id            TEXT PRIMARY KEY,
            name          TEXT NOT NULL,
            nis           TEXT NOT NULL UNIQUE,
            rfid_uid      TEXT UNIQUE,
            class_id      TEXT REFERENCES classes(id),
            department_id TEXT REFERENCES departments(id),
            section_id    TEXT REFERENCES sections(id),
            created_at    TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_students_name ON students(name);
        CREATE INDEX IF NOT EXISTS idx_students_class ON students(class_id);
        "#,
    },
    Migration {
        version: "20250812_0004_attendance",
        description: "Created attendance table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS attendance (
            id         TEXT PRIMARY KEY,
            student_id TEXT NOT NULL REFERENCES students(id) ON DELETE CASCADE,
            date       TEXT NOT NULL,
            check_in   TEXT,
            check_out  TEXT,
            status     TEXT NOT NULL DEFAULT 'present'
                       CHECK(status IN ('present','late','excused','sick','absent')),
            note       TEXT,
            created_at TEXT NOT NULL,
            UNIQUE(student_id, date)
        );

        CREATE INDEX IF NOT EXISTS idx_attendance_latest ON attendance(date, check_in);
        CREATE INDEX IF NOT EXISTS idx_attendance_status ON attendance(status);
        "#,
    },
    Migration {
        version: "20250814_0005_rfid_scans",
        description: "Created rfid_scans table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS rfid_scans (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            uid        TEXT NOT NULL,
            scanned_at TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20250820_0006_attendance_change_log",
        description: "Created change_log table and attendance triggers",
        sql: r#"
        CREATE TABLE IF NOT EXISTS change_log (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            table_name TEXT NOT NULL,
            op         TEXT NOT NULL CHECK(op IN ('insert','update','delete')),
            row_id     TEXT NOT NULL,
            changed_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now'))
        );

        CREATE TRIGGER IF NOT EXISTS trg_attendance_insert AFTER INSERT ON attendance
        BEGIN
            INSERT INTO change_log (table_name, op, row_id) VALUES ('attendance', 'insert', NEW.id);
        END;

        CREATE TRIGGER IF NOT EXISTS trg_attendance_update AFTER UPDATE ON attendance
        BEGIN
            INSERT INTO change_log (table_name, op, row_id) VALUES ('attendance', 'update', NEW.id);
        END;

        CREATE TRIGGER IF NOT EXISTS trg_attendance_delete AFTER DELETE ON attendance
        BEGIN
            INSERT INTO change_log (table_name, op, row_id) VALUES ('attendance', 'delete', OLD.id);
        END;
        "#,
    },
];

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Public entry point: run all pending migrations.
/// Returns the number of migrations applied by this call.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;

    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            debug!(version = m.version, "migration already applied");
            continue;
        }

        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(m.sql)?;
        tx.execute(
            "INSERT INTO log (date, operation, target, message)
             VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
            [m.version, m.description],
        )?;
        tx.commit()?;

        success(format!("Migration applied: {} → {}", m.version, m.description));
        applied += 1;
    }

    Ok(applied)
}
