use super::open_db;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::{LogRow, load_log};
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use ansi_term::Colour;

/// ANSI colour for a log operation.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "create" => Colour::Green,
        "delete" => Colour::Red,
        "update" => Colour::Yellow,
        "migration_applied" => Colour::Purple,
        "reference" => Colour::Cyan,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

fn op_target(row: &LogRow) -> String {
    if row.target.is_empty() {
        row.operation.clone()
    } else {
        format!("{} ({})", row.operation, row.target)
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if matches!(cmd, Commands::Log { print: true }) {
        let conn = open_db(cfg)?;
        let rows = load_log(&conn)?;

        if rows.is_empty() {
            info("Internal log is empty.");
            return Ok(());
        }

        let id_w = rows.iter().map(|r| r.id.to_string().len()).max().unwrap_or(1);
        let date_w = rows.iter().map(|r| r.date.len()).max().unwrap_or(10);
        let op_w = rows.iter().map(|r| op_target(r).len()).max().unwrap_or(10).min(60);

        header("📜 Internal log");
        for row in &rows {
            let label = format!("{:<op_w$}", op_target(row), op_w = op_w);
            println!(
                "{:>id_w$}  {:<date_w$}  {}  {}",
                row.id,
                row.date,
                color_for_operation(&row.operation).paint(label),
                row.message,
                id_w = id_w,
                date_w = date_w,
            );
        }
    }

    Ok(())
}
