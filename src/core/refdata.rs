//! Classes, departments and sections: one set of operations driven by
//! `RefKind`.

use crate::db::db_utils::{new_id, now_rfc3339};
use crate::db::log::audit_quiet;
use crate::db::pool::DbPool;
use crate::db::reference::{delete_ref, find_ref_by_name, insert_ref, list_refs, rename_ref};
use crate::errors::{AppError, AppResult};
use crate::models::reference::{RefItem, RefKind};

fn clean_name(kind: RefKind, name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation(format!("{} name is required", kind.label())));
    }
    Ok(name.to_string())
}

fn require(pool: &DbPool, kind: RefKind, name: &str) -> AppResult<RefItem> {
    find_ref_by_name(&pool.conn, kind, name)?
        .ok_or_else(|| AppError::NotFound(format!("{} '{}'", kind.label(), name.trim())))
}

pub struct RefLogic;

impl RefLogic {
    pub fn add(pool: &mut DbPool, kind: RefKind, name: &str) -> AppResult<RefItem> {
        let item = RefItem {
            id: new_id(),
            name: clean_name(kind, name)?,
            student_count: 0,
            created_at: now_rfc3339(),
        };

        insert_ref(&pool.conn, kind, &item)?;
        audit_quiet(&pool.conn, "add", kind.table(), &format!("Added {}", item.name));
        Ok(item)
    }

    pub fn list(pool: &DbPool, kind: RefKind, search: Option<&str>) -> AppResult<Vec<RefItem>> {
        list_refs(&pool.conn, kind, search)
    }

    pub fn rename(pool: &mut DbPool, kind: RefKind, name: &str, new_name: &str) -> AppResult<RefItem> {
        let mut item = require(pool, kind, name)?;
        let new_name = clean_name(kind, new_name)?;

        rename_ref(&pool.conn, kind, &item.id, &new_name)?;
        audit_quiet(
            &pool.conn,
            "rename",
            kind.table(),
            &format!("{} → {}", item.name, new_name),
        );

        item.name = new_name;
        Ok(item)
    }

    /// Look up the entry to delete, refusing entries students still point at.
    pub fn deletable(pool: &DbPool, kind: RefKind, name: &str) -> AppResult<RefItem> {
        let item = require(pool, kind, name)?;
        if item.student_count > 0 {
            return Err(AppError::InUse(format!(
                "{} '{}' still has {} student(s); move them first",
                kind.label(),
                item.name,
                item.student_count
            )));
        }
        Ok(item)
    }

    pub fn delete(pool: &mut DbPool, kind: RefKind, item: &RefItem) -> AppResult<()> {
        delete_ref(&pool.conn, kind, &item.id)?;
        audit_quiet(&pool.conn, "del", kind.table(), &format!("Deleted {}", item.name));
        Ok(())
    }
}
