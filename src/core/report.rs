//! Filtered attendance listings shared by `attendance list` and `report`.

use crate::db::queries::AttendanceFilter;
use crate::errors::{AppError, AppResult};
use crate::export::parse_optional_range;
use crate::models::attendance::{AttendanceDetail, StatusSummary};
use crate::models::status::AttendanceStatus;
use crate::utils::colors::{
    BLUE, GREEN, MAGENTA, RED, RESET, YELLOW, colorize_optional, colorize_status,
};
use crate::utils::formatting::{or_dash, truncate};
use crate::utils::table::Table;

pub fn parse_status(s: &str) -> AppResult<AttendanceStatus> {
    AttendanceStatus::from_input(s).ok_or_else(|| AppError::InvalidStatus(s.to_string()))
}

pub fn build_filter(
    range: Option<&str>,
    status: Option<&str>,
    class: Option<&str>,
    search: Option<&str>,
) -> AppResult<AttendanceFilter> {
    let bounds = parse_optional_range(range)?;
    Ok(AttendanceFilter {
        from: bounds.map(|(d1, _)| d1),
        to: bounds.map(|(_, d2)| d2),
        status: status.map(parse_status).transpose()?,
        class_name: class.map(str::trim).filter(|c| !c.is_empty()).map(str::to_string),
        search: search.map(str::to_string),
    })
}

pub fn render_summary(s: &StatusSummary) -> String {
    format!(
        "Total: {} | {GREEN}Present: {}{RESET} | {YELLOW}Late: {}{RESET} | {BLUE}Excused: {}{RESET} | {MAGENTA}Sick: {}{RESET} | {RED}Absent: {}{RESET}",
        s.total, s.present, s.late, s.excused, s.sick, s.absent
    )
}

pub fn render_rows(rows: &[AttendanceDetail], show_id: bool) -> String {
    let mut headers = vec!["Date", "Student", "NIS", "Class", "In", "Out", "Status", "Note"];
    if show_id {
        headers.insert(0, "ID");
    }
    let mut table = Table::new(headers);

    for d in rows {
        let mut row = vec![
            d.record.date_str(),
            truncate(&d.student_name, 28),
            d.nis.clone(),
            or_dash(Some(d.placement().as_str())),
            colorize_optional(&d.record.check_in_str()),
            colorize_optional(&d.record.check_out_str()),
            colorize_status(d.record.status),
            truncate(&or_dash(d.record.note.as_deref()), 30),
        ];
        if show_id {
            row.insert(0, d.record.id.clone());
        }
        table.add_row(row);
    }

    table.render()
}
