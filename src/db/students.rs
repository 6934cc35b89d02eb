use crate::db::db_utils::{like_pattern, map_unique};
use crate::errors::{AppError, AppResult};
use crate::models::student::{Student, StudentView};
use rusqlite::{Connection, OptionalExtension, Row, params};

const VIEW_SELECT: &str = "
    SELECT s.id, s.name, s.nis, s.rfid_uid, s.class_id, s.department_id, s.section_id, s.created_at,
           c.name, d.name, se.name
    FROM students s
    LEFT JOIN classes c ON c.id = s.class_id
    LEFT JOIN departments d ON d.id = s.department_id
    LEFT JOIN sections se ON se.id = s.section_id";

fn map_view(row: &Row) -> rusqlite::Result<StudentView> {
    Ok(StudentView {
        student: Student {
            id: row.get(0)?,
            name: row.get(1)?,
            nis: row.get(2)?,
            rfid_uid: row.get(3)?,
            class_id: row.get(4)?,
            department_id: row.get(5)?,
            section_id: row.get(6)?,
            created_at: row.get(7)?,
        },
        class_name: row.get(8)?,
        department_name: row.get(9)?,
        section_name: row.get(10)?,
    })
}

pub fn insert_student(conn: &Connection, s: &Student) -> AppResult<()> {
    conn.execute(
        "INSERT INTO students (id, name, nis, rfid_uid, class_id, department_id, section_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            s.id,
            s.name,
            s.nis,
            s.rfid_uid,
            s.class_id,
            s.department_id,
            s.section_id,
            s.created_at,
        ],
    )
    .map_err(|e| map_unique(e, format!("Student with NIS {} or RFID card", s.nis)))?;
    Ok(())
}

pub fn update_student(conn: &Connection, s: &Student) -> AppResult<()> {
    let n = conn
        .execute(
            "UPDATE students
             SET name = ?1, nis = ?2, rfid_uid = ?3,
                 class_id = ?4, department_id = ?5, section_id = ?6
             WHERE id = ?7",
            params![
                s.name,
                s.nis,
                s.rfid_uid,
                s.class_id,
                s.department_id,
                s.section_id,
                s.id,
            ],
        )
        .map_err(|e| map_unique(e, format!("Student with NIS {} or RFID card", s.nis)))?;
    if n == 0 {
        return Err(AppError::NotFound(format!("Student {}", s.id)));
    }
    Ok(())
}

pub fn delete_student(conn: &Connection, id: &str) -> AppResult<()> {
    conn.execute("DELETE FROM students WHERE id = ?1", [id])?;
    Ok(())
}

pub fn find_student_by_nis(conn: &Connection, nis: &str) -> AppResult<Option<StudentView>> {
    let sql = format!("{VIEW_SELECT} WHERE s.nis = ?1");
    Ok(conn.query_row(&sql, [nis.trim()], map_view).optional()?)
}

pub fn find_student_by_rfid(conn: &Connection, uid: &str) -> AppResult<Option<StudentView>> {
    let sql = format!("{VIEW_SELECT} WHERE s.rfid_uid = ?1");
    Ok(conn.query_row(&sql, [uid], map_view).optional()?)
}

pub fn list_students(conn: &Connection, search: Option<&str>) -> AppResult<Vec<StudentView>> {
    let pattern = like_pattern(search.unwrap_or(""));
    let sql = format!(
        "{VIEW_SELECT}
         WHERE lower(s.name) LIKE ?1 ESCAPE '\\' OR lower(s.nis) LIKE ?1 ESCAPE '\\'
         ORDER BY s.name COLLATE NOCASE ASC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([pattern], map_view)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
