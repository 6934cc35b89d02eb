//! Queries shared by classes, departments and sections. Table and column
//! names come from `RefKind`, never from user input.

use crate::db::db_utils::{like_pattern, map_unique};
use crate::errors::{AppError, AppResult};
use crate::models::reference::{RefItem, RefKind};
use rusqlite::{Connection, OptionalExtension, Row, params};

fn select_sql(kind: RefKind) -> String {
    format!(
        "SELECT r.id, r.name, r.created_at,
                (SELECT COUNT(*) FROM students s WHERE s.{col} = r.id)
         FROM {table} r",
        col = kind.student_column(),
        table = kind.table()
    )
}

fn map_item(row: &Row) -> rusqlite::Result<RefItem> {
    Ok(RefItem {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
        student_count: row.get(3)?,
    })
}

pub fn insert_ref(conn: &Connection, kind: RefKind, item: &RefItem) -> AppResult<()> {
    conn.execute(
        &format!(
            "INSERT INTO {} (id, name, created_at) VALUES (?1, ?2, ?3)",
            kind.table()
        ),
        params![item.id, item.name, item.created_at],
    )
    .map_err(|e| map_unique(e, format!("{} '{}'", kind.label(), item.name)))?;
    Ok(())
}

pub fn find_ref_by_name(conn: &Connection, kind: RefKind, name: &str) -> AppResult<Option<RefItem>> {
    let sql = format!("{} WHERE r.name = ?1 COLLATE NOCASE", select_sql(kind));
    Ok(conn.query_row(&sql, [name.trim()], map_item).optional()?)
}

/// Resolve a name to its id, `NotFound` when unknown.
pub fn require_ref_id(conn: &Connection, kind: RefKind, name: &str) -> AppResult<String> {
    find_ref_by_name(conn, kind, name)?
        .map(|r| r.id)
        .ok_or_else(|| AppError::NotFound(format!("{} '{}'", kind.label(), name)))
}

pub fn list_refs(conn: &Connection, kind: RefKind, search: Option<&str>) -> AppResult<Vec<RefItem>> {
    let pattern = like_pattern(search.unwrap_or(""));
    let sql = format!(
        "{} WHERE lower(r.name) LIKE ?1 ESCAPE '\\' ORDER BY r.name COLLATE NOCASE ASC",
        select_sql(kind)
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([pattern], map_item)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn rename_ref(conn: &Connection, kind: RefKind, id: &str, new_name: &str) -> AppResult<()> {
    conn.execute(
        &format!("UPDATE {} SET name = ?1 WHERE id = ?2", kind.table()),
        params![new_name, id],
    )
    .map_err(|e| map_unique(e, format!("{} '{}'", kind.label(), new_name)))?;
    Ok(())
}

pub fn delete_ref(conn: &Connection, kind: RefKind, id: &str) -> AppResult<()> {
    conn.execute(&format!("DELETE FROM {} WHERE id = ?1", kind.table()), [id])?;
    Ok(())
}
