//! Signed-in state of the console and the guard deciding which commands
//! need it.

use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::user::User;
use chrono::{DateTime, Local, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    pub full_name: String,
    pub signed_in_at: DateTime<Local>,
    pub expires_at: DateTime<Local>,
}

impl Session {
    pub fn for_user(user: &User, hours: i64) -> AppResult<Self> {
        let now = Local::now();
        let expires_at = TimeDelta::try_hours(hours.max(1))
            .and_then(|d| now.checked_add_signed(d))
            .ok_or_else(|| AppError::Config(format!("session_hours: {hours} is out of range")))?;

        Ok(Self {
            user_id: user.id.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            signed_in_at: now,
            expires_at,
        })
    }

    pub fn is_expired(&self, now: DateTime<Local>) -> bool {
        now >= self.expires_at
    }

    /// Read the session file. Missing, unreadable or expired sessions are
    /// all "not signed in"; stale files are removed.
    pub fn load(path: &Path) -> AppResult<Option<Session>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)?;
        let session: Session = match serde_json::from_str(&content) {
            Ok(s) => s,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "discarding unreadable session file");
                fs::remove_file(path)?;
                return Ok(None);
            }
        };

        if session.is_expired(Local::now()) {
            debug!(email = %session.email, "session expired");
            fs::remove_file(path)?;
            return Ok(None);
        }

        Ok(Some(session))
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Remove the session file. Returns false when nobody was signed in.
    pub fn clear(path: &Path) -> AppResult<bool> {
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)?;
        Ok(true)
    }
}

/// Who may run a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Admin screens: a valid session is required
    Admin,
    /// Login / registration: pointless while signed in
    Guest,
    /// Everything else
    Public,
}

pub fn route_for(cmd: &Commands) -> Route {
    match cmd {
        Commands::Student { .. }
        | Commands::Class { .. }
        | Commands::Dept { .. }
        | Commands::Section { .. }
        | Commands::Attendance { .. }
        | Commands::Report { .. }
        | Commands::Stats => Route::Admin,
        Commands::Login { .. } | Commands::Register { .. } => Route::Guest,
        _ => Route::Public,
    }
}

/// Outcome of the guard for a given command.
#[derive(Debug)]
pub enum Access {
    Granted(Option<Session>),
    AlreadySignedIn(Session),
}

pub fn check_access(cmd: &Commands, cfg: &Config) -> AppResult<Access> {
    let route = route_for(cmd);
    if route == Route::Public {
        return Ok(Access::Granted(None));
    }

    let session = Session::load(&cfg.session_file())?;

    match (route, session) {
        (Route::Admin, None) => Err(AppError::LoginRequired),
        (Route::Guest, Some(s)) => Ok(Access::AlreadySignedIn(s)),
        (_, s) => Ok(Access::Granted(s)),
    }
}
