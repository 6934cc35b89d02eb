//! What the live display shows, and how each fetch result changes it.

use crate::errors::{AppError, AppResult};
use crate::models::attendance::AttendanceDetail;

#[derive(Debug, Clone, PartialEq)]
pub enum FeedView {
    Loading,
    Empty,
    Showing(AttendanceDetail),
    /// Rendered message of the failure; the user may retry
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedState {
    view: FeedView,
    last_id: Option<String>,
    transitions: u64,
}

impl Default for FeedState {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedState {
    pub fn new() -> Self {
        Self {
            view: FeedView::Loading,
            last_id: None,
            transitions: 0,
        }
    }

    pub fn view(&self) -> &FeedView {
        &self.view
    }

    /// Identifier of the record shown last, kept across errors.
    pub fn last_id(&self) -> Option<&str> {
        self.last_id.as_deref()
    }

    /// Number of times a new record replaced the display.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    pub fn record(&self) -> Option<&AttendanceDetail> {
        match &self.view {
            FeedView::Showing(r) => Some(r),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.view, FeedView::Error(_))
    }

    /// Fold one fetch result in. Returns true when anything visible changed.
    pub fn apply(&mut self, result: AppResult<AttendanceDetail>) -> bool {
        match result {
            Ok(rec) => self.show(rec),
            Err(e) if e.is_no_rows() => self.empty(),
            Err(e) => self.fail(&e),
        }
    }

    fn show(&mut self, rec: AttendanceDetail) -> bool {
        if self.last_id.as_deref() == Some(rec.id()) {
            // Same record: leave it alone, unless we are coming back from
            // an error or a retry
            if matches!(self.view, FeedView::Showing(_)) {
                return false;
            }
            self.view = FeedView::Showing(rec);
            return true;
        }

        self.last_id = Some(rec.id().to_string());
        self.view = FeedView::Showing(rec);
        self.transitions += 1;
        true
    }

    fn empty(&mut self) -> bool {
        self.last_id = None;
        if self.view == FeedView::Empty {
            return false;
        }
        self.view = FeedView::Empty;
        true
    }

    fn fail(&mut self, e: &AppError) -> bool {
        let msg = e.to_string();
        if self.view == FeedView::Error(msg.clone()) {
            return false;
        }
        self.view = FeedView::Error(msg);
        true
    }

    /// User asked to retry: only meaningful from the error state.
    pub fn begin_retry(&mut self) -> bool {
        if !self.is_error() {
            return false;
        }
        self.view = FeedView::Loading;
        true
    }
}
