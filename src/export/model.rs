use crate::models::attendance::AttendanceDetail;
use serde::Serialize;

/// Flat row for CSV / JSON export (csv cannot serialize nested structs).
#[derive(Serialize, Clone, Debug)]
pub struct AttendanceExport {
    pub id: String,
    pub date: String,
    pub student: String,
    pub nis: String,
    pub class: String,
    pub department: String,
    pub section: String,
    pub check_in: String,
    pub check_out: String,
    pub status: String,
    pub note: String,
}

impl From<&AttendanceDetail> for AttendanceExport {
    fn from(d: &AttendanceDetail) -> Self {
        let time = |t: Option<chrono::NaiveTime>| {
            t.map(|t| t.format("%H:%M:%S").to_string()).unwrap_or_default()
        };

        Self {
            id: d.record.id.clone(),
            date: d.record.date_str(),
            student: d.student_name.clone(),
            nis: d.nis.clone(),
            class: d.class_name.clone().unwrap_or_default(),
            department: d.department_name.clone().unwrap_or_default(),
            section: d.section_name.clone().unwrap_or_default(),
            check_in: time(d.record.check_in),
            check_out: time(d.record.check_out),
            status: d.record.status.to_db_str().to_string(),
            note: d.record.note.clone().unwrap_or_default(),
        }
    }
}
