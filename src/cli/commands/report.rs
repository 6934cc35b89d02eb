use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::attendance::AttendanceLogic;
use crate::core::report::{build_filter, render_rows, render_summary};
use crate::db::log::audit_quiet;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::ExportLogic;
use crate::ui::messages::{header, info};
use crate::utils::path::expand_tilde;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Report {
        range,
        status,
        class,
        search,
        export,
        file,
        force,
    } = cmd
    else {
        return Ok(());
    };

    let filter = build_filter(
        range.as_deref(),
        status.as_deref(),
        class.as_deref(),
        search.as_deref(),
    )?;

    let pool = DbPool::new(&cfg.database)?;
    let (rows, summary) = AttendanceLogic::list(&pool, &filter)?;

    if let Some(format) = export {
        let file = file
            .as_deref()
            .ok_or_else(|| AppError::Export("--file is required with --export".into()))?;
        let path = expand_tilde(file);
        let written = ExportLogic::export(&rows, *format, &path, *force)?;
        if written > 0 {
            audit_quiet(
                &pool.conn,
                "export",
                &path.to_string_lossy(),
                &format!("{} row(s) as {}", written, format.as_str()),
            );
        }
        return Ok(());
    }

    let title = match range.as_deref() {
        Some(r) => format!("Attendance report {}", r),
        None => "Attendance report".to_string(),
    };
    header(title);
    println!("{}\n", render_summary(&summary));

    if rows.is_empty() {
        info("No attendance records match the selected filters.");
    } else {
        print!("{}", render_rows(&rows, false));
    }

    Ok(())
}
