use crate::errors::AppError;
use crate::models::attendance::{DATE_FMT, TIME_FMT};
use chrono::{Local, NaiveDate, NaiveTime};
use rusqlite::ffi;
use rusqlite::types::Type;

/// New primary key for every TEXT-keyed table.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub fn now_rfc3339() -> String {
    Local::now().to_rfc3339()
}

/// `%needle%` for a `LIKE … ESCAPE '\'` match, with the user's own `%`, `_`
/// and `\` taken literally.
pub fn like_pattern(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    out.push('%');
    for c in needle.trim().to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

/// Map a UNIQUE violation to `Duplicate(what)`, anything else stays a DB error.
pub fn map_unique(err: rusqlite::Error, what: impl Into<String>) -> AppError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
        {
            AppError::Duplicate(what.into())
        }
        _ => AppError::Db(err),
    }
}

pub(crate) fn parse_date_col(idx: usize, s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FMT).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            Box::new(AppError::InvalidDate(s.to_string())),
        )
    })
}

pub(crate) fn parse_time_col(idx: usize, s: Option<String>) -> rusqlite::Result<Option<NaiveTime>> {
    match s {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => NaiveTime::parse_from_str(&s, TIME_FMT)
            .map(Some)
            .map_err(|_| {
                rusqlite::Error::FromSqlConversionFailure(
                    idx,
                    Type::Text,
                    Box::new(AppError::InvalidTime(s.clone())),
                )
            }),
    }
}
