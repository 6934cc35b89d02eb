use crate::models::attendance::DATE_FMT;
use chrono::NaiveDate;

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FMT).ok()
}

/// Long form used on the live display, e.g. "Monday, 18 August 2025".
pub fn long_date(d: &NaiveDate) -> String {
    d.format("%A, %-d %B %Y").to_string()
}
