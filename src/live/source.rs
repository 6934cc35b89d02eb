use crate::db::pool::DbPool;
use crate::db::queries::load_latest_detail;
use crate::errors::{AppError, AppResult};
use crate::models::attendance::AttendanceDetail;
use std::future::Future;
use std::path::PathBuf;

/// Where the watcher gets "the latest attendance row" from.
///
/// An empty table must be reported as an error for which
/// [`AppError::is_no_rows`] is true.
pub trait AttendanceSource: Send + Sync + 'static {
    fn fetch_latest(&self) -> impl Future<Output = AppResult<AttendanceDetail>> + Send;
}

/// Reads the SQLite store, one short-lived connection per fetch on the
/// blocking pool.
#[derive(Debug, Clone)]
pub struct SqliteAttendanceSource {
    db_path: PathBuf,
}

impl SqliteAttendanceSource {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }
}

impl AttendanceSource for SqliteAttendanceSource {
    fn fetch_latest(&self) -> impl Future<Output = AppResult<AttendanceDetail>> + Send {
        let path = self.db_path.clone();
        async move {
            tokio::task::spawn_blocking(move || {
                let pool = DbPool::new(&path.to_string_lossy())?;
                load_latest_detail(&pool.conn)
            })
            .await
            .map_err(|e| AppError::Feed(format!("fetch task failed: {e}")))?
        }
    }
}
