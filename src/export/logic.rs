use crate::errors::{AppError, AppResult};
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::{AttendanceExport, ExportFormat};
use crate::models::attendance::AttendanceDetail;
use crate::ui::messages::warning;
use std::path::Path;

pub struct ExportLogic;

impl ExportLogic {
    /// Write already-filtered attendance rows to `path` (absolute).
    /// Returns the number of rows written.
    pub fn export(
        rows: &[AttendanceDetail],
        format: ExportFormat,
        path: &Path,
        force: bool,
    ) -> AppResult<usize> {
        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "Output file path must be absolute: {}",
                path.display()
            )));
        }

        if rows.is_empty() {
            warning("No attendance records match the selected filters, nothing exported.");
            return Ok(0);
        }

        ensure_writable(path, force)?;

        let flat: Vec<AttendanceExport> = rows.iter().map(AttendanceExport::from).collect();

        match format {
            ExportFormat::Csv => export_csv(&flat, path)?,
            ExportFormat::Json => export_json(&flat, path)?,
        }

        Ok(flat.len())
    }
}
