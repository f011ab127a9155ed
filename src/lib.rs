//! entrybook library root.
//! Exposes the CLI parser, the web application and the high-level run() function.

pub mod cli;
pub mod config;
pub mod db;
pub mod errors;
pub mod logging;
pub mod models;
pub mod options;
pub mod store;
pub mod ui;
pub mod utils;
pub mod web;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use std::path::{Path, PathBuf};

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config, config_path: &Path) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli, config_path),
        Commands::Serve { .. } => cli::commands::serve::handle(&cli.command, cfg),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg, config_path),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
        Commands::Ref { .. } => cli::commands::reference::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(Config::config_file);

    // Configuration is loaded once; `--db` wins over the file.
    let mut cfg = Config::load_from(&config_path)?;
    // A relative `--db` is resolved against the configuration directory, the
    // same way `init` creates it.
    if let Some(custom_db) = &cli.db {
        cfg.database = Config::resolve_database(custom_db, &config_path)
            .to_string_lossy()
            .to_string();
    }

    dispatch(&cli, &cfg, &config_path)
}
