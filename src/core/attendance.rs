use crate::core::students::StudentLogic;
use crate::db::db_utils::{new_id, now_rfc3339};
use crate::db::log::audit_quiet;
use crate::db::pool::DbPool;
use crate::db::queries::{
    AttendanceFilter, delete_attendance, insert_attendance, list_details, load_detail,
    update_attendance,
};
use crate::errors::{AppError, AppResult};
use crate::models::attendance::{AttendanceDetail, AttendanceRecord, StatusSummary};
use crate::models::status::AttendanceStatus;
use chrono::{NaiveDate, NaiveTime};

fn clean_note(note: Option<&str>) -> Option<String> {
    note.map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

fn check_order(check_in: Option<NaiveTime>, check_out: Option<NaiveTime>) -> AppResult<()> {
    if let (Some(i), Some(o)) = (check_in, check_out)
        && o < i
    {
        return Err(AppError::Validation(format!(
            "Check-out {} is before check-in {}",
            o, i
        )));
    }
    Ok(())
}

pub struct ManualEntry<'a> {
    pub nis: &'a str,
    pub date: NaiveDate,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub status: AttendanceStatus,
    pub note: Option<&'a str>,
}

#[derive(Debug, Default)]
pub struct AttendancePatch<'a> {
    pub status: Option<AttendanceStatus>,
    pub note: Option<&'a str>,
    pub check_out: Option<NaiveTime>,
    pub clear_out: bool,
}

pub struct AttendanceLogic;

impl AttendanceLogic {
    pub fn list(
        pool: &DbPool,
        filter: &AttendanceFilter,
    ) -> AppResult<(Vec<AttendanceDetail>, StatusSummary)> {
        let rows = list_details(&pool.conn, filter)?;
        let summary = StatusSummary::from_rows(&rows);
        Ok((rows, summary))
    }

    pub fn add(pool: &mut DbPool, entry: &ManualEntry) -> AppResult<AttendanceDetail> {
        let student = StudentLogic::require(pool, entry.nis)?;
        check_order(entry.check_in, entry.check_out)?;

        let rec = AttendanceRecord {
            id: new_id(),
            student_id: student.student.id.clone(),
            date: entry.date,
            check_in: entry.check_in,
            check_out: entry.check_out,
            status: entry.status,
            note: clean_note(entry.note),
            created_at: now_rfc3339(),
        };

        insert_attendance(&pool.conn, &rec).map_err(|e| match e {
            AppError::Duplicate(_) => AppError::Duplicate(format!(
                "Attendance for {} on {}",
                student.student.name,
                rec.date_str()
            )),
            other => other,
        })?;

        audit_quiet(
            &pool.conn,
            "add",
            "attendance",
            &format!(
                "{} {} {}",
                student.student.nis,
                rec.date_str(),
                rec.status.to_db_str()
            ),
        );

        load_detail(&pool.conn, &rec.id)
    }

    pub fn edit(pool: &mut DbPool, id: &str, patch: &AttendancePatch) -> AppResult<AttendanceDetail> {
        let mut rec = load_detail(&pool.conn, id)?.record;

        if let Some(status) = patch.status {
            rec.status = status;
        }
        if let Some(note) = patch.note {
            rec.note = clean_note(Some(note));
        }
        if patch.clear_out {
            rec.check_out = None;
        } else if let Some(out) = patch.check_out {
            rec.check_out = Some(out);
        }
        check_order(rec.check_in, rec.check_out)?;

        update_attendance(&pool.conn, &rec)?;
        audit_quiet(&pool.conn, "edit", "attendance", &format!("Updated {}", rec.id));

        load_detail(&pool.conn, id)
    }

    pub fn require(pool: &DbPool, id: &str) -> AppResult<AttendanceDetail> {
        load_detail(&pool.conn, id)
    }

    pub fn delete(pool: &mut DbPool, detail: &AttendanceDetail) -> AppResult<()> {
        delete_attendance(&pool.conn, detail.id())?;
        audit_quiet(
            &pool.conn,
            "del",
            "attendance",
            &format!("{} {}", detail.nis, detail.record.date_str()),
        );
        Ok(())
    }
}
