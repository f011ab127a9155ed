use super::open_db;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::ttlog;
use crate::db::queries::{insert_reference, load_options};
use crate::errors::{AppError, AppResult};
use crate::models::reference::ReferenceKind;
use crate::ui::messages::{header, info, success};

/// Handle the `ref` command: add or list vendors and departments.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Ref { kind, add, list } = cmd {
        let kind = ReferenceKind::from(*kind);
        let conn = open_db(cfg)?;

        if let Some(name) = add {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::Other(format!(
                    "a name is required to add to {}",
                    kind.label()
                )));
            }
            let id = insert_reference(&conn, kind, name)?;
            ttlog(
                &conn,
                "reference",
                kind.table(),
                &format!("Added '{}' with id {}", name, id),
            )?;
            success(format!("Added '{}' to {} (id {})", name, kind.label(), id));
        }

        if *list {
            let options = load_options(&conn, kind)?;
            if options.is_empty() {
                info(format!("No {} defined.", kind.label()));
            } else {
                header(format!("📋 {}", kind.label()));
                for (id, name) in options.iter() {
                    println!("{:>6}  {}", id, name);
                }
            }
        }
    }

    Ok(())
}
