use crate::cli::parser::{Commands, StudentAction};
use crate::config::Config;
use crate::core::students::{NewStudent, StudentLogic, StudentPatch};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::student::StudentView;
use crate::ui::messages::{header, info, success};
use crate::ui::prompt::ask_confirmation;
use crate::utils::colors::colorize_optional;
use crate::utils::formatting::or_dash;
use crate::utils::table::Table;

fn print_students(rows: &[StudentView]) {
    let mut table = Table::new(vec!["NIS", "Name", "Class", "RFID"]);
    for s in rows {
        table.add_row(vec![
            s.student.nis.clone(),
            s.student.name.clone(),
            or_dash(Some(s.placement().as_str())),
            colorize_optional(&or_dash(s.student.rfid_uid.as_deref())),
        ]);
    }
    print!("{}", table.render());
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Student { action } = cmd else {
        return Ok(());
    };

    let mut pool = DbPool::new(&cfg.database)?;

    match action {
        StudentAction::Add {
            name,
            nis,
            rfid,
            class,
            dept,
            section,
        } => {
            let s = StudentLogic::add(
                &mut pool,
                &NewStudent {
                    name,
                    nis,
                    rfid: rfid.as_deref(),
                    class: class.as_deref(),
                    department: dept.as_deref(),
                    section: section.as_deref(),
                },
            )?;
            success(format!("Student {} ({}) added", s.student.name, s.student.nis));
        }

        StudentAction::List { search } => {
            let rows = StudentLogic::list(&pool, search.as_deref())?;
            header(format!("Students ({})", rows.len()));
            if rows.is_empty() {
                info("No students found.");
            } else {
                print_students(&rows);
            }
        }

        StudentAction::Update {
            nis,
            name,
            new_nis,
            rfid,
            clear_rfid,
            class,
            dept,
            section,
        } => {
            let s = StudentLogic::update(
                &mut pool,
                nis,
                &StudentPatch {
                    name: name.as_deref(),
                    nis: new_nis.as_deref(),
                    rfid: rfid.as_deref(),
                    clear_rfid: *clear_rfid,
                    class: class.as_deref(),
                    department: dept.as_deref(),
                    section: section.as_deref(),
                },
            )?;
            success(format!("Student {} ({}) updated", s.student.name, s.student.nis));
        }

        StudentAction::Del { nis, yes } => {
            let s = StudentLogic::require(&pool, nis)?;
            let prompt = format!(
                "Delete student {} ({}) and all their attendance? This action is irreversible.",
                s.student.name, s.student.nis
            );
            if !*yes && !ask_confirmation(&prompt) {
                info("Operation cancelled.");
                return Ok(());
            }
            StudentLogic::delete(&mut pool, &s)?;
            success(format!("Student {} deleted", s.student.nis));
        }
    }

    Ok(())
}
