use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::tap::{TapLogic, TapOutcome, TapRules};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use crate::utils::colors::colorize_status;
use crate::utils::time::{now_local, parse_timestamp};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Tap { uid, at } = cmd else {
        return Ok(());
    };

    let rules = TapRules::from_config(cfg)?;
    let at = match at {
        Some(s) => parse_timestamp(s)?,
        None => now_local(),
    };

    let mut pool = DbPool::new(&cfg.database)?;

    match TapLogic::apply(&mut pool, &rules, uid, at)? {
        TapOutcome::UnknownCard(uid) => {
            warning(format!("Unknown card {uid}: no student has it, nothing recorded"));
        }
        TapOutcome::CheckedIn(d) => {
            success(format!(
                "{} checked in at {} ({})",
                d.student_name,
                d.record.check_in_str(),
                colorize_status(d.record.status)
            ));
        }
        TapOutcome::CheckedOut(d) => {
            success(format!(
                "{} checked out at {}",
                d.student_name,
                d.record.check_out_str()
            ));
        }
        TapOutcome::AlreadyCheckedIn(d) => {
            info(format!(
                "{} already checked in at {}",
                d.student_name,
                d.record.check_in_str()
            ));
        }
        TapOutcome::AlreadyCheckedOut(d) => {
            info(format!(
                "{} already checked in and out today ({} - {})",
                d.student_name,
                d.record.check_in_str(),
                d.record.check_out_str()
            ));
        }
    }

    Ok(())
}
