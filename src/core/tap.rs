//! What a card tap does to the day's attendance.

use crate::config::Config;
use crate::core::students::normalize_uid;
use crate::db::db_utils::{new_id, now_rfc3339};
use crate::db::log::audit_quiet;
use crate::db::pool::DbPool;
use crate::db::queries::{
    find_for_student_on, insert_attendance, insert_scan, load_detail, update_attendance,
};
use crate::db::students::find_student_by_rfid;
use crate::errors::{AppError, AppResult};
use crate::models::attendance::{AttendanceDetail, AttendanceRecord};
use crate::models::status::AttendanceStatus;
use crate::utils::time::parse_time;
use chrono::{NaiveDateTime, NaiveTime};
use rusqlite::{Connection, TransactionBehavior};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapRules {
    pub on_time_until: NaiveTime,
    pub checkout_from: NaiveTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapDecision {
    CheckIn(AttendanceStatus),
    CheckOut,
    AlreadyCheckedIn,
    AlreadyCheckedOut,
}

impl TapRules {
    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        let parse = |key: &str, value: &str| {
            parse_time(value)
                .ok_or_else(|| AppError::Config(format!("{key}: invalid time '{value}'")))
        };
        Ok(Self {
            on_time_until: parse("on_time_until", &cfg.on_time_until)?,
            checkout_from: parse("checkout_from", &cfg.checkout_from)?,
        })
    }

    pub fn status_for(&self, at: NaiveTime) -> AttendanceStatus {
        if at <= self.on_time_until {
            AttendanceStatus::Present
        } else {
            AttendanceStatus::Late
        }
    }

    pub fn decide(&self, today: Option<&AttendanceRecord>, at: NaiveTime) -> TapDecision {
        match today {
            None => TapDecision::CheckIn(self.status_for(at)),
            Some(r) if r.check_out.is_some() => TapDecision::AlreadyCheckedOut,
            Some(_) if at >= self.checkout_from => TapDecision::CheckOut,
            Some(_) => TapDecision::AlreadyCheckedIn,
        }
    }
}

#[derive(Debug)]
pub enum TapOutcome {
    UnknownCard(String),
    CheckedIn(AttendanceDetail),
    CheckedOut(AttendanceDetail),
    AlreadyCheckedIn(AttendanceDetail),
    AlreadyCheckedOut(AttendanceDetail),
}

pub struct TapLogic;

impl TapLogic {
    /// Record one scan. The read-decide-write runs in an IMMEDIATE
    /// transaction so concurrent taps for the same student serialise.
    pub fn apply(
        pool: &mut DbPool,
        rules: &TapRules,
        uid: &str,
        at: NaiveDateTime,
    ) -> AppResult<TapOutcome> {
        let uid = normalize_uid(uid);
        if uid.is_empty() {
            return Err(AppError::Validation("Card UID is required".into()));
        }

        let tx = pool
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let outcome = Self::apply_in(&tx, rules, &uid, at)?;
        tx.commit()?;
        Ok(outcome)
    }

    fn apply_in(
        conn: &Connection,
        rules: &TapRules,
        uid: &str,
        at: NaiveDateTime,
    ) -> AppResult<TapOutcome> {
        insert_scan(conn, uid, &at.format("%Y-%m-%d %H:%M:%S").to_string())?;

        let Some(student) = find_student_by_rfid(conn, uid)? else {
            audit_quiet(conn, "tap_unknown", uid, "Card not registered");
            return Ok(TapOutcome::UnknownCard(uid.to_string()));
        };

        let date = at.date();
        let time = at.time();
        let existing = find_for_student_on(conn, &student.student.id, &date)?;
        let decision = rules.decide(existing.as_ref(), time);
        debug!(%uid, ?decision, "tap");

        match (decision, existing) {
            (TapDecision::CheckIn(status), _) => {
                let rec = AttendanceRecord {
                    id: new_id(),
                    student_id: student.student.id.clone(),
                    date,
                    check_in: Some(time),
                    check_out: None,
                    status,
                    note: None,
                    created_at: now_rfc3339(),
                };
                insert_attendance(conn, &rec)?;
                audit_quiet(
                    conn,
                    "tap_in",
                    &student.student.nis,
                    &format!("{} {}", rec.check_in_str(), status.to_db_str()),
                );
                Ok(TapOutcome::CheckedIn(load_detail(conn, &rec.id)?))
            }
            (TapDecision::CheckOut, Some(mut rec)) => {
                rec.check_out = Some(time);
                update_attendance(conn, &rec)?;
                audit_quiet(
                    conn,
                    "tap_out",
                    &student.student.nis,
                    &rec.check_out_str(),
                );
                Ok(TapOutcome::CheckedOut(load_detail(conn, &rec.id)?))
            }
            (TapDecision::AlreadyCheckedOut, Some(rec)) => {
                Ok(TapOutcome::AlreadyCheckedOut(load_detail(conn, &rec.id)?))
            }
            (_, Some(rec)) => Ok(TapOutcome::AlreadyCheckedIn(load_detail(conn, &rec.id)?)),
            (_, None) => Err(AppError::Other(
                "tap decision needs today's record".into(),
            )),
        }
    }
}
