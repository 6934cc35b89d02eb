use crate::config::Config;
use crate::db::pool::DbPool;
use crate::db::stats::{file_size_mb, load_counts};
use crate::errors::AppResult;
use crate::ui::messages::header;
use crate::utils::colors::{CYAN, GREEN, RESET};

pub fn handle(cfg: &Config) -> AppResult<()> {
    let pool = DbPool::new(&cfg.database)?;
    let counts = load_counts(&pool.conn)?;

    header(format!("{} statistics", cfg.school_name));
    for (label, n) in [
        ("Students", counts.students),
        ("Classes", counts.classes),
        ("Attendance records", counts.attendance),
    ] {
        println!("{}• {}:{} {}{}{}", CYAN, label, RESET, GREEN, n, RESET);
    }
    println!(
        "{}• Database size:{} {:.2} MB",
        CYAN,
        RESET,
        file_size_mb(&cfg.database)
    );

    Ok(())
}
