use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use std::fs;
use std::path::Path;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config, config_path: &Path) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
    } = cmd
    {
        // ---- PRINT CONFIG ----
        if *print_config {
            println!("📄 Current configuration ({}):\n", config_path.display());
            println!("{}", cfg.to_yaml()?);
        }

        // ---- CHECK CONFIG ----
        if *check {
            if config_path.exists() {
                let content = fs::read_to_string(config_path)?;
                let missing = Config::missing_fields(&content)?;
                if missing.is_empty() {
                    success("All configuration fields are present.");
                } else {
                    for field in &missing {
                        warning(format!("Missing field '{}' (default value is used)", field));
                    }
                }
            } else {
                info(format!(
                    "No configuration file at {}, defaults are used.",
                    config_path.display()
                ));
            }

            let problems = cfg.validate();
            if problems.is_empty() {
                success("Configuration values are valid.");
            } else {
                for p in &problems {
                    warning(p);
                }
                return Err(crate::errors::AppError::Config(format!(
                    "{} invalid value(s)",
                    problems.len()
                )));
            }
        }
    }

    Ok(())
}
