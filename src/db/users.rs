use crate::db::db_utils::map_unique;
use crate::errors::AppResult;
use crate::models::user::User;
use rusqlite::{Connection, OptionalExtension, params};

pub fn insert_user(conn: &Connection, user: &User) -> AppResult<()> {
    conn.execute(
        "INSERT INTO users (id, email, full_name, password_hash, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user.id,
            user.email,
            user.full_name,
            user.password_hash,
            user.created_at
        ],
    )
    .map_err(|e| map_unique(e, format!("Email {}", user.email)))?;
    Ok(())
}

pub fn find_user_by_email(conn: &Connection, email: &str) -> AppResult<Option<User>> {
    let user = conn
        .query_row(
            "SELECT id, email, full_name, password_hash, created_at
             FROM users WHERE email = ?1",
            [email],
            |row| {
                Ok(User {
                    id: row.get(0)?,
                    email: row.get(1)?,
                    full_name: row.get(2)?,
                    password_hash: row.get(3)?,
                    created_at: row.get(4)?,
                })
            },
        )
        .optional()?;
    Ok(user)
}
