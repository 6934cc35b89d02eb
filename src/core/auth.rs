use crate::db::db_utils::{new_id, now_rfc3339};
use crate::db::log::audit_quiet;
use crate::db::pool::DbPool;
use crate::db::users::{find_user_by_email, insert_user};
use crate::errors::{AppError, AppResult};
use crate::models::user::User;
use sha2::{Digest, Sha256};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Lower-case hex SHA-256 of the password, the format stored in `users`.
pub fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub struct Registration<'a> {
    pub full_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub confirm: &'a str,
}

impl Registration<'_> {
    pub fn validate(&self) -> AppResult<()> {
        if self.full_name.trim().is_empty() {
            return Err(AppError::Validation("Full name is required".into()));
        }
        if self.email.trim().is_empty() {
            return Err(AppError::Validation("Email is required".into()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if self.password != self.confirm {
            return Err(AppError::Validation(
                "Password and confirmation do not match".into(),
            ));
        }
        Ok(())
    }
}

pub struct AuthLogic;

impl AuthLogic {
    pub fn register(pool: &mut DbPool, reg: &Registration) -> AppResult<User> {
        reg.validate()?;

        let email = normalize_email(reg.email);
        if find_user_by_email(&pool.conn, &email)?.is_some() {
            return Err(AppError::Duplicate(format!("Email {email}")));
        }

        let user = User {
            id: new_id(),
            email,
            full_name: reg.full_name.trim().to_string(),
            password_hash: hash_password(reg.password),
            created_at: now_rfc3339(),
        };
        insert_user(&pool.conn, &user)?;

        audit_quiet(&pool.conn, "register", &user.email, "Admin account created");
        Ok(user)
    }

    pub fn login(pool: &mut DbPool, email: &str, password: &str) -> AppResult<User> {
        if email.trim().is_empty() || password.trim().is_empty() {
            return Err(AppError::Validation(
                "Email and password are required".into(),
            ));
        }

        let email = normalize_email(email);
        let user = find_user_by_email(&pool.conn, &email)?
            .ok_or_else(|| AppError::UnknownEmail(email.clone()))?;

        if user.password_hash != hash_password(password) {
            audit_quiet(&pool.conn, "login_failed", &email, "Wrong password");
            return Err(AppError::InvalidCredentials);
        }

        audit_quiet(&pool.conn, "login", &email, "Signed in");
        Ok(user)
    }
}
