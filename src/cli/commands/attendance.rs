use crate::cli::parser::{AttendanceAction, Commands};
use crate::config::Config;
use crate::core::attendance::{AttendanceLogic, AttendancePatch, ManualEntry};
use crate::core::report::{build_filter, parse_status, render_rows, render_summary};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{header, info, success};
use crate::ui::prompt::ask_confirmation;
use crate::utils::date::{parse_date, today};
use crate::utils::time::{parse_optional_time, parse_time};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Attendance { action } = cmd else {
        return Ok(());
    };

    let mut pool = DbPool::new(&cfg.database)?;

    match action {
        AttendanceAction::List {
            range,
            status,
            class,
            search,
        } => {
            let filter = build_filter(
                range.as_deref(),
                status.as_deref(),
                class.as_deref(),
                search.as_deref(),
            )?;
            let (rows, summary) = AttendanceLogic::list(&pool, &filter)?;

            header("Attendance");
            println!("{}\n", render_summary(&summary));
            if rows.is_empty() {
                info("No attendance records found.");
            } else {
                print!("{}", render_rows(&rows, true));
            }
        }

        AttendanceAction::Add {
            nis,
            date,
            check_in,
            check_out,
            status,
            note,
        } => {
            let date = match date {
                Some(d) => parse_date(d).ok_or_else(|| AppError::InvalidDate(d.clone()))?,
                None => today(),
            };

            let detail = AttendanceLogic::add(
                &mut pool,
                &ManualEntry {
                    nis,
                    date,
                    check_in: parse_optional_time(check_in.as_ref())?,
                    check_out: parse_optional_time(check_out.as_ref())?,
                    status: parse_status(status)?,
                    note: note.as_deref(),
                },
            )?;

            success(format!(
                "Attendance added for {} on {} ({})",
                detail.student_name,
                detail.record.date_str(),
                detail.record.status.label()
            ));
            info(format!("Record id: {}", detail.id()));
        }

        AttendanceAction::Edit {
            id,
            status,
            note,
            check_out,
            clear_out,
        } => {
            let check_out = match check_out {
                Some(t) => Some(parse_time(t).ok_or_else(|| AppError::InvalidTime(t.clone()))?),
                None => None,
            };

            let detail = AttendanceLogic::edit(
                &mut pool,
                id,
                &AttendancePatch {
                    status: status.as_deref().map(parse_status).transpose()?,
                    note: note.as_deref(),
                    check_out,
                    clear_out: *clear_out,
                },
            )?;

            success(format!(
                "Attendance of {} on {} updated ({})",
                detail.student_name,
                detail.record.date_str(),
                detail.record.status.label()
            ));
        }

        AttendanceAction::Del { id, yes } => {
            let detail = AttendanceLogic::require(&pool, id)?;
            let prompt = format!(
                "Delete attendance of {} on {}? This action is irreversible.",
                detail.student_name,
                detail.record.date_str()
            );
            if !*yes && !ask_confirmation(&prompt) {
                info("Operation cancelled.");
                return Ok(());
            }
            AttendanceLogic::delete(&mut pool, &detail)?;
            success("Attendance record deleted");
        }
    }

    Ok(())
}
