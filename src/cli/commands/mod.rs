pub mod config;
pub mod db;
pub mod init;
pub mod log;
pub mod reference;
pub mod serve;

use crate::config::Config;
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::open_connection;
use crate::errors::AppResult;
use rusqlite::Connection;
use std::path::Path;

/// Open the configured database with the schema brought up to date.
pub(crate) fn open_db(cfg: &Config) -> AppResult<Connection> {
    let mut conn = open_connection(Path::new(&cfg.database))?;
    run_pending_migrations(&mut conn)?;
    Ok(conn)
}
