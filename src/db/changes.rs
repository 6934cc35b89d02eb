//! Reads the `change_log` table the attendance triggers append to.

use rusqlite::{Connection, params};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRow {
    pub id: i64,
    pub table_name: String,
    pub op: String,
    pub row_id: String,
}

/// Rows older than this are dropped by `db --vacuum` and when a live feed
/// starts. A feed only ever reads rows newer than its start, so a day is
/// ample.
pub const CHANGE_LOG_KEEP_SECS: u64 = 24 * 60 * 60;

/// Highest change id so far, 0 on an empty log.
pub fn max_change_id(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT COALESCE(MAX(id), 0) FROM change_log", [], |row| {
        row.get(0)
    })
}

pub fn changes_since(conn: &Connection, after_id: i64, table: &str) -> rusqlite::Result<Vec<ChangeRow>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, table_name, op, row_id
         FROM change_log
         WHERE id > ?1 AND table_name = ?2
         ORDER BY id ASC",
    )?;

    let rows = stmt.query_map(params![after_id, table], |row| {
        Ok(ChangeRow {
            id: row.get(0)?,
            table_name: row.get(1)?,
            op: row.get(2)?,
            row_id: row.get(3)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Delete change rows older than `keep_secs`. Ids are AUTOINCREMENT, so
/// pruning never lets an id be handed out twice.
pub fn prune_changes(conn: &Connection, keep_secs: u64) -> rusqlite::Result<usize> {
    conn.execute(
        "DELETE FROM change_log
         WHERE changed_at < strftime('%Y-%m-%dT%H:%M:%fZ', 'now', ?1)",
        [format!("-{keep_secs} seconds")],
    )
}
