use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::log;
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::open_connection;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use std::path::Path;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the SQLite database and all pending migrations
pub fn handle(cli: &Cli, config_path: &Path) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.clone(), config_path, cli.test)?;
    let db_path = cfg.database.clone();

    println!("⚙️  Initializing entrybook…");
    if !cli.test {
        println!("📄 Config file : {}", config_path.display());
    }
    println!("🗄️  Database   : {}", &db_path);

    let mut conn = open_connection(Path::new(&db_path))?;
    let applied = run_pending_migrations(&mut conn)?;
    success(format!(
        "Database initialized at {} ({} migration(s) applied)",
        &db_path, applied
    ));

    if let Err(e) = log::ttlog(
        &conn,
        "init",
        "Database initialized",
        &format!("Database initialized at {}", &db_path),
    ) {
        warning(format!("Failed to write internal log: {}", e));
    }

    println!("🎉 entrybook initialization completed!");
    Ok(())
}
