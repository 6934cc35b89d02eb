//! Attendance queries: the joined "detail" view used by listings, reports
//! and the live display, plus the plain row writes.

use crate::db::db_utils::{like_pattern, map_unique, parse_date_col, parse_time_col};
use crate::errors::{AppError, AppResult};
use crate::models::attendance::{AttendanceDetail, AttendanceRecord, DATE_FMT, TIME_FMT};
use crate::models::status::AttendanceStatus;
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};

const DETAIL_SELECT: &str = "
    SELECT a.id, a.student_id, a.date, a.check_in, a.check_out, a.status, a.note, a.created_at,
           s.name, s.nis, s.rfid_uid, c.name, d.name, se.name
    FROM attendance a
    JOIN students s ON s.id = a.student_id
    LEFT JOIN classes c ON c.id = s.class_id
    LEFT JOIN departments d ON d.id = s.department_id
    LEFT JOIN sections se ON se.id = s.section_id";

/// Newest first: by date, then check-in time (rows without one last),
/// then insertion time.
const LATEST_ORDER: &str =
    " ORDER BY a.date DESC, a.check_in IS NULL, a.check_in DESC, a.created_at DESC";

/// Filters accepted by the attendance list and the report.
#[derive(Debug, Clone, Default)]
pub struct AttendanceFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<AttendanceStatus>,
    pub class_name: Option<String>,
    /// Case-insensitive match on student name or NIS
    pub search: Option<String>,
}

pub fn map_record(row: &Row) -> rusqlite::Result<AttendanceRecord> {
    let date_str: String = row.get(2)?;
    let status_str: String = row.get(5)?;

    let status = AttendanceStatus::from_db_str(&status_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            5,
            Type::Text,
            Box::new(AppError::InvalidStatus(status_str.clone())),
        )
    })?;

    Ok(AttendanceRecord {
        id: row.get(0)?,
        student_id: row.get(1)?,
        date: parse_date_col(2, &date_str)?,
        check_in: parse_time_col(3, row.get(3)?)?,
        check_out: parse_time_col(4, row.get(4)?)?,
        status,
        note: row.get(6)?,
        created_at: row.get(7)?,
    })
}

pub fn map_detail(row: &Row) -> rusqlite::Result<AttendanceDetail> {
    Ok(AttendanceDetail {
        record: map_record(row)?,
        student_name: row.get(8)?,
        nis: row.get(9)?,
        rfid_uid: row.get(10)?,
        class_name: row.get(11)?,
        department_name: row.get(12)?,
        section_name: row.get(13)?,
    })
}

/// The single most recent attendance row, joined with its student.
/// Fails with `NotFound` when the table is empty.
pub fn load_latest_detail(conn: &Connection) -> AppResult<AttendanceDetail> {
    let sql = format!("{DETAIL_SELECT}{LATEST_ORDER} LIMIT 1");
    conn.query_row(&sql, [], map_detail)
        .optional()?
        .ok_or_else(|| AppError::NotFound("Attendance record".into()))
}

pub fn load_detail(conn: &Connection, id: &str) -> AppResult<AttendanceDetail> {
    let sql = format!("{DETAIL_SELECT} WHERE a.id = ?1");
    conn.query_row(&sql, [id], map_detail)
        .optional()?
        .ok_or_else(|| AppError::NotFound(format!("Attendance record {id}")))
}

pub fn list_details(conn: &Connection, filter: &AttendanceFilter) -> AppResult<Vec<AttendanceDetail>> {
    let mut clauses: Vec<String> = Vec::new();
    let mut args: Vec<String> = Vec::new();

    if let Some(from) = filter.from {
        args.push(from.format(DATE_FMT).to_string());
        clauses.push(format!("a.date >= ?{}", args.len()));
    }
    if let Some(to) = filter.to {
        args.push(to.format(DATE_FMT).to_string());
        clauses.push(format!("a.date <= ?{}", args.len()));
    }
    if let Some(status) = filter.status {
        args.push(status.to_db_str().to_string());
        clauses.push(format!("a.status = ?{}", args.len()));
    }
    if let Some(class) = &filter.class_name {
        args.push(class.clone());
        clauses.push(format!("c.name = ?{} COLLATE NOCASE", args.len()));
    }
    if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
        args.push(like_pattern(search));
        let n = args.len();
        clauses.push(format!(
            "(lower(s.name) LIKE ?{n} ESCAPE '\\' OR lower(s.nis) LIKE ?{n} ESCAPE '\\')"
        ));
    }

    let mut sql = DETAIL_SELECT.to_string();
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(LATEST_ORDER);

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(args.iter()), map_detail)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn find_for_student_on(
    conn: &Connection,
    student_id: &str,
    date: &NaiveDate,
) -> AppResult<Option<AttendanceRecord>> {
    let rec = conn
        .query_row(
            "SELECT id, student_id, date, check_in, check_out, status, note, created_at
             FROM attendance
             WHERE student_id = ?1 AND date = ?2",
            params![student_id, date.format(DATE_FMT).to_string()],
            map_record,
        )
        .optional()?;
    Ok(rec)
}

pub fn insert_attendance(conn: &Connection, rec: &AttendanceRecord) -> AppResult<()> {
    conn.execute(
        "INSERT INTO attendance (id, student_id, date, check_in, check_out, status, note, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            rec.id,
            rec.student_id,
            rec.date.format(DATE_FMT).to_string(),
            rec.check_in.map(|t| t.format(TIME_FMT).to_string()),
            rec.check_out.map(|t| t.format(TIME_FMT).to_string()),
            rec.status.to_db_str(),
            rec.note,
            rec.created_at,
        ],
    )
    .map_err(|e| map_unique(e, format!("Attendance for {}", rec.date)))?;
    Ok(())
}

/// Update an attendance row (all fields except id and student)
pub fn update_attendance(conn: &Connection, rec: &AttendanceRecord) -> AppResult<()> {
    let n = conn.execute(
        "UPDATE attendance
         SET date = ?1, check_in = ?2, check_out = ?3, status = ?4, note = ?5
         WHERE id = ?6",
        params![
            rec.date.format(DATE_FMT).to_string(),
            rec.check_in.map(|t| t.format(TIME_FMT).to_string()),
            rec.check_out.map(|t| t.format(TIME_FMT).to_string()),
            rec.status.to_db_str(),
            rec.note,
            rec.id,
        ],
    )?;
    if n == 0 {
        return Err(AppError::NotFound(format!("Attendance record {}", rec.id)));
    }
    Ok(())
}

pub fn delete_attendance(conn: &Connection, id: &str) -> AppResult<()> {
    let n = conn.execute("DELETE FROM attendance WHERE id = ?1", [id])?;
    if n == 0 {
        return Err(AppError::NotFound(format!("Attendance record {id}")));
    }
    Ok(())
}

pub fn insert_scan(conn: &Connection, uid: &str, scanned_at: &str) -> AppResult<()> {
    conn.execute(
        "INSERT INTO rfid_scans (uid, scanned_at) VALUES (?1, ?2)",
        params![uid, scanned_at],
    )?;
    Ok(())
}
