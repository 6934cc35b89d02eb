use crate::errors::{AppError, AppResult};
use crate::ui::prompt::ask_confirmation;
use std::path::Path;

/// A missing file, or `--force`, may always be written; an existing one
/// only after the user agrees.
pub(crate) fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if force || !path.exists() {
        return Ok(());
    }

    let question = format!("The file '{}' already exists. Overwrite it?", path.display());
    if ask_confirmation(&question) {
        Ok(())
    } else {
        Err(AppError::Export(
            "cancelled, existing file not overwritten".into(),
        ))
    }
}
