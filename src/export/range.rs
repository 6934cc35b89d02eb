use crate::errors::{AppError, AppResult};
use crate::models::attendance::DATE_FMT;
use chrono::{Datelike, NaiveDate};

fn bad(msg: impl Into<String>) -> AppError {
    AppError::InvalidRange(msg.into())
}

/// First and last day covered by `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
fn bounds_of(part: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    match part.len() {
        4 => {
            let y: i32 = part.parse().map_err(|_| bad(format!("invalid year '{part}'")))?;
            let d1 = NaiveDate::from_ymd_opt(y, 1, 1).ok_or_else(|| bad("invalid start date"))?;
            let d2 = NaiveDate::from_ymd_opt(y, 12, 31).ok_or_else(|| bad("invalid end date"))?;
            Ok((d1, d2))
        }
        7 => {
            let first = NaiveDate::parse_from_str(&format!("{part}-01"), DATE_FMT)
                .map_err(|_| bad(format!("invalid month '{part}'")))?;
            let last = month_last_day(first.year(), first.month())
                .and_then(|d| first.with_day(d))
                .ok_or_else(|| bad(format!("invalid month '{part}'")))?;
            Ok((first, last))
        }
        10 => {
            let d = NaiveDate::parse_from_str(part, DATE_FMT)
                .map_err(|_| bad(format!("invalid date '{part}'")))?;
            Ok((d, d))
        }
        _ => Err(bad(format!("unsupported range format '{part}'"))),
    }
}

/// Parse `--range`.
///
/// Supports:
/// - YYYY
/// - YYYY-MM
/// - YYYY-MM-DD
/// - YYYY:YYYY
/// - YYYY-MM:YYYY-MM
/// - YYYY-MM-DD:YYYY-MM-DD
pub fn parse_range(r: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let r = r.trim();

    let Some((start_raw, end_raw)) = r.split_once(':') else {
        return bounds_of(r);
    };

    let start = start_raw.trim();
    let end = end_raw.trim();
    if start.len() != end.len() {
        return Err(bad("start and end must have same format"));
    }

    let (d1, _) = bounds_of(start)?;
    let (_, d2) = bounds_of(end)?;
    if d1 > d2 {
        return Err(bad(format!("{start} is after {end}")));
    }
    Ok((d1, d2))
}

/// `None` for a missing range or "all".
pub fn parse_optional_range(r: Option<&str>) -> AppResult<Option<(NaiveDate, NaiveDate)>> {
    match r {
        None => Ok(None),
        Some(r) if r.trim().eq_ignore_ascii_case("all") => Ok(None),
        Some(r) => parse_range(r).map(Some),
    }
}

fn month_last_day(y: i32, m: u32) -> Option<u32> {
    match m {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Some(31),
        4 | 6 | 9 | 11 => Some(30),
        2 => {
            let leap = (y % 4 == 0 && y % 100 != 0) || (y % 400 == 0);
            Some(if leap { 29 } else { 28 })
        }
        _ => None,
    }
}
