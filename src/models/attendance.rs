use super::status::AttendanceStatus;
use super::student::placement;
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

pub const TIME_FMT: &str = "%H:%M:%S";
pub const DATE_FMT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceRecord {
    pub id: String,
    pub student_id: String,
    pub date: NaiveDate,              // ⇔ attendance.date (TEXT "YYYY-MM-DD")
    pub check_in: Option<NaiveTime>,  // ⇔ attendance.check_in (TEXT "HH:MM:SS")
    pub check_out: Option<NaiveTime>, // ⇔ attendance.check_out (TEXT "HH:MM:SS")
    pub status: AttendanceStatus,
    pub note: Option<String>,
    pub created_at: String,
}

impl AttendanceRecord {
    pub fn date_str(&self) -> String {
        self.date.format(DATE_FMT).to_string()
    }

    pub fn check_in_str(&self) -> String {
        fmt_opt_time(self.check_in)
    }

    pub fn check_out_str(&self) -> String {
        fmt_opt_time(self.check_out)
    }
}

pub fn fmt_opt_time(t: Option<NaiveTime>) -> String {
    t.map(|t| t.format(TIME_FMT).to_string())
        .unwrap_or_else(|| "--:--:--".to_string())
}

/// Attendance row joined with the student and its reference data,
/// which is what the admin lists and the live display show.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceDetail {
    #[serde(flatten)]
    pub record: AttendanceRecord,
    pub student_name: String,
    pub nis: String,
    pub rfid_uid: Option<String>,
    pub class_name: Option<String>,
    pub department_name: Option<String>,
    pub section_name: Option<String>,
}

impl AttendanceDetail {
    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn placement(&self) -> String {
        placement(
            self.class_name.as_deref(),
            self.department_name.as_deref(),
            self.section_name.as_deref(),
        )
    }
}

/// Per-status counters shown above every attendance listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub total: usize,
    pub present: usize,
    pub late: usize,
    pub excused: usize,
    pub sick: usize,
    pub absent: usize,
}

impl StatusSummary {
    pub fn from_rows(rows: &[AttendanceDetail]) -> Self {
        let mut s = StatusSummary {
            total: rows.len(),
            ..Default::default()
        };
        for r in rows {
            match r.record.status {
                AttendanceStatus::Present => s.present += 1,
                AttendanceStatus::Late => s.late += 1,
                AttendanceStatus::Excused => s.excused += 1,
                AttendanceStatus::Sick => s.sick += 1,
                AttendanceStatus::Absent => s.absent += 1,
            }
        }
        s
    }
}
