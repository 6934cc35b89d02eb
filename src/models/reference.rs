use serde::Serialize;

/// The three lookup tables a student points at. They share one schema
/// (id, name, created_at) and one set of admin commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Class,
    Department,
    Section,
}

impl RefKind {
    pub fn table(&self) -> &'static str {
        match self {
            RefKind::Class => "classes",
            RefKind::Department => "departments",
            RefKind::Section => "sections",
        }
    }

    /// Column in `students` referencing this table
    pub fn student_column(&self) -> &'static str {
        match self {
            RefKind::Class => "class_id",
            RefKind::Department => "department_id",
            RefKind::Section => "section_id",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RefKind::Class => "Class",
            RefKind::Department => "Department",
            RefKind::Section => "Section",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            RefKind::Class => "classes",
            RefKind::Department => "departments",
            RefKind::Section => "sections",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RefItem {
    pub id: String,
    pub name: String,
    pub student_count: i64,
    pub created_at: String,
}
