use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::formatting::truncate;
use crate::utils::table::visible_width;
use ansi_term::Colour;

const OP_WIDTH: usize = 48;

/// Colour of the operation word in the audit listing
fn color_for_operation(op: &str) -> Colour {
    match op {
        "add" | "register" | "tap_in" => Colour::Green,
        "del" => Colour::Red,
        "edit" | "rename" | "tap_out" => Colour::Yellow,
        "login" | "logout" => Colour::Cyan,
        "login_failed" | "tap_unknown" => Colour::RGB(255, 153, 51),
        "migration_applied" | "config_migrate" => Colour::Purple,
        "export" | "vacuum" => Colour::Blue,
        _ => Colour::White,
    }
}

struct LogEntry {
    id: i64,
    date: String,
    operation: String,
    target: String,
    message: String,
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &mut DbPool) -> AppResult<()> {
        let mut stmt = pool.conn.prepare_cached(
            "SELECT id, date, operation, target, message FROM log ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            let raw_date: String = row.get(1)?;
            let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                .map(|dt| dt.format("%F %T").to_string())
                .unwrap_or(raw_date);

            Ok(LogEntry {
                id: row.get(0)?,
                date,
                operation: row.get(2)?,
                target: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                message: row.get(4)?,
            })
        })?;

        let mut entries = Vec::new();
        for r in rows {
            entries.push(r?);
        }

        if entries.is_empty() {
            info("The log is empty.");
            return Ok(());
        }

        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries.iter().map(|e| e.date.len()).max().unwrap_or(10);

        println!("📜 Internal log:\n");

        for e in entries {
            let color = color_for_operation(&e.operation);

            // only the operation word is coloured, the target follows plain
            let mut cell = color.paint(e.operation.as_str()).to_string();
            if !e.target.is_empty() {
                let room = OP_WIDTH.saturating_sub(e.operation.chars().count() + 3);
                cell.push_str(&format!(" ({})", truncate(&e.target, room)));
            }

            let padding = " ".repeat(OP_WIDTH.saturating_sub(visible_width(&cell)));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                e.id,
                e.date,
                cell,
                padding,
                e.message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
