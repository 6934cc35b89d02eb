use crate::db::db_utils::{new_id, now_rfc3339};
use crate::db::log::audit_quiet;
use crate::db::pool::DbPool;
use crate::db::reference::require_ref_id;
use crate::db::students::{
    delete_student, find_student_by_nis, insert_student, list_students, update_student,
};
use crate::errors::{AppError, AppResult};
use crate::models::reference::RefKind;
use crate::models::student::{Student, StudentView};
use rusqlite::Connection;

/// Card UIDs are stored upper-case without surrounding blanks, the way the
/// readers send them.
pub fn normalize_uid(uid: &str) -> String {
    uid.trim().to_uppercase()
}

fn resolve(conn: &Connection, kind: RefKind, name: Option<&str>) -> AppResult<Option<String>> {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(n) => Ok(Some(require_ref_id(conn, kind, n)?)),
        None => Ok(None),
    }
}

#[derive(Debug, Default)]
pub struct NewStudent<'a> {
    pub name: &'a str,
    pub nis: &'a str,
    pub rfid: Option<&'a str>,
    pub class: Option<&'a str>,
    pub department: Option<&'a str>,
    pub section: Option<&'a str>,
}

/// Fields left as `None` keep their current value.
#[derive(Debug, Default)]
pub struct StudentPatch<'a> {
    pub name: Option<&'a str>,
    pub nis: Option<&'a str>,
    pub rfid: Option<&'a str>,
    pub clear_rfid: bool,
    pub class: Option<&'a str>,
    pub department: Option<&'a str>,
    pub section: Option<&'a str>,
}

pub struct StudentLogic;

impl StudentLogic {
    pub fn add(pool: &mut DbPool, input: &NewStudent) -> AppResult<StudentView> {
        let name = input.name.trim();
        let nis = input.nis.trim();
        if name.is_empty() || nis.is_empty() {
            return Err(AppError::Validation("Student name and NIS are required".into()));
        }

        let student = Student {
            id: new_id(),
            name: name.to_string(),
            nis: nis.to_string(),
            rfid_uid: input.rfid.map(normalize_uid).filter(|u| !u.is_empty()),
            class_id: resolve(&pool.conn, RefKind::Class, input.class)?,
            department_id: resolve(&pool.conn, RefKind::Department, input.department)?,
            section_id: resolve(&pool.conn, RefKind::Section, input.section)?,
            created_at: now_rfc3339(),
        };

        insert_student(&pool.conn, &student)?;
        audit_quiet(&pool.conn, "add", "students", &format!("Added {} ({})", name, nis));

        Self::require(pool, nis)
    }

    pub fn require(pool: &DbPool, nis: &str) -> AppResult<StudentView> {
        find_student_by_nis(&pool.conn, nis)?
            .ok_or_else(|| AppError::NotFound(format!("Student with NIS {}", nis.trim())))
    }

    pub fn list(pool: &DbPool, search: Option<&str>) -> AppResult<Vec<StudentView>> {
        list_students(&pool.conn, search)
    }

    pub fn update(pool: &mut DbPool, nis: &str, patch: &StudentPatch) -> AppResult<StudentView> {
        let current = Self::require(pool, nis)?;
        let mut s = current.student;

        if let Some(name) = patch.name.map(str::trim).filter(|n| !n.is_empty()) {
            s.name = name.to_string();
        }
        if let Some(new_nis) = patch.nis.map(str::trim).filter(|n| !n.is_empty()) {
            s.nis = new_nis.to_string();
        }
        if patch.clear_rfid {
            s.rfid_uid = None;
        } else if let Some(uid) = patch.rfid {
            s.rfid_uid = Some(normalize_uid(uid)).filter(|u| !u.is_empty());
        }
        if patch.class.is_some() {
            s.class_id = resolve(&pool.conn, RefKind::Class, patch.class)?;
        }
        if patch.department.is_some() {
            s.department_id = resolve(&pool.conn, RefKind::Department, patch.department)?;
        }
        if patch.section.is_some() {
            s.section_id = resolve(&pool.conn, RefKind::Section, patch.section)?;
        }

        update_student(&pool.conn, &s)?;
        audit_quiet(&pool.conn, "edit", "students", &format!("Updated {} ({})", s.name, s.nis));

        Self::require(pool, &s.nis)
    }

    /// Delete a student; the attendance rows go with it (ON DELETE CASCADE).
    pub fn delete(pool: &mut DbPool, student: &StudentView) -> AppResult<()> {
        delete_student(&pool.conn, &student.student.id)?;
        audit_quiet(
            &pool.conn,
            "del",
            "students",
            &format!("Deleted {} ({})", student.student.name, student.student.nis),
        );
        Ok(())
    }
}
