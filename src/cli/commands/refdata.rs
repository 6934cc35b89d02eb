use crate::cli::parser::{Commands, RefAction};
use crate::config::Config;
use crate::core::refdata::RefLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::reference::RefKind;
use crate::ui::messages::{header, info, success};
use crate::ui::prompt::ask_confirmation;
use crate::utils::table::Table;

/// `class`, `dept` and `section` share this handler.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let (kind, action) = match cmd {
        Commands::Class { action } => (RefKind::Class, action),
        Commands::Dept { action } => (RefKind::Department, action),
        Commands::Section { action } => (RefKind::Section, action),
        _ => return Ok(()),
    };

    let mut pool = DbPool::new(&cfg.database)?;

    match action {
        RefAction::Add { name } => {
            let item = RefLogic::add(&mut pool, kind, name)?;
            success(format!("{} '{}' added", kind.label(), item.name));
        }

        RefAction::List { search } => {
            let rows = RefLogic::list(&pool, kind, search.as_deref())?;
            header(format!("{} list ({})", kind.label(), rows.len()));
            if rows.is_empty() {
                info(format!("No {} found.", kind.plural()));
                return Ok(());
            }

            let mut table = Table::new(vec!["Name", "Students"]);
            for r in rows {
                table.add_row(vec![r.name, r.student_count.to_string()]);
            }
            print!("{}", table.render());
        }

        RefAction::Rename { name, new_name } => {
            let item = RefLogic::rename(&mut pool, kind, name, new_name)?;
            success(format!("{} '{}' renamed to '{}'", kind.label(), name, item.name));
        }

        RefAction::Del { name, yes } => {
            let item = RefLogic::deletable(&pool, kind, name)?;
            let prompt = format!("Delete {} '{}'?", kind.label().to_lowercase(), item.name);
            if !*yes && !ask_confirmation(&prompt) {
                info("Operation cancelled.");
                return Ok(());
            }
            RefLogic::delete(&mut pool, kind, &item)?;
            success(format!("{} '{}' deleted", kind.label(), item.name));
        }
    }

    Ok(())
}
