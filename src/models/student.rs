use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub nis: String,                   // ⇔ students.nis (school registration number, unique)
    pub rfid_uid: Option<String>,      // ⇔ students.rfid_uid (upper-case hex, unique)
    pub class_id: Option<String>,      // ⇔ classes.id
    pub department_id: Option<String>, // ⇔ departments.id
    pub section_id: Option<String>,    // ⇔ sections.id
    pub created_at: String,
}

/// Student joined with the names of its reference rows.
#[derive(Debug, Clone, Serialize)]
pub struct StudentView {
    #[serde(flatten)]
    pub student: Student,
    pub class_name: Option<String>,
    pub department_name: Option<String>,
    pub section_name: Option<String>,
}

impl StudentView {
    /// "X RPL 1" style placement, empty parts skipped.
    pub fn placement(&self) -> String {
        placement(
            self.class_name.as_deref(),
            self.department_name.as_deref(),
            self.section_name.as_deref(),
        )
    }
}

pub fn placement(class: Option<&str>, department: Option<&str>, section: Option<&str>) -> String {
    [class, department, section]
        .into_iter()
        .flatten()
        .filter(|s| !s.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
