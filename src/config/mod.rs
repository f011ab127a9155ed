use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_db_workers")]
    pub db_workers: usize,
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub json_logs: bool,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    9000
}
fn default_page_size() -> u32 {
    10
}
fn default_db_workers() -> usize {
    4
}
fn default_queue_capacity() -> usize {
    64
}
fn default_log_level() -> String {
    "info".to_string()
}

/// Fields every configuration file is expected to carry.
pub const EXPECTED_FIELDS: [&str; 8] = [
    "database",
    "host",
    "port",
    "page_size",
    "db_workers",
    "queue_capacity",
    "log_level",
    "json_logs",
];

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            host: default_host(),
            port: default_port(),
            page_size: default_page_size(),
            db_workers: default_db_workers(),
            queue_capacity: default_queue_capacity(),
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

impl Config {
    /// Return the standard configuration directory (`~/.entrybook`)
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".entrybook")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("entrybook.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("entrybook.sqlite")
    }

    /// Load configuration from the standard file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    /// Load configuration from an explicit path, or return defaults if the file is missing
    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        serde_yaml::from_str(content).map_err(|e| AppError::ConfigLoad(e.to_string()))
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// `host:port` as given in the configuration.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Sanity checks on values serde can't reject by itself.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.database.trim().is_empty() {
            problems.push("database path is empty".to_string());
        }
        if self.page_size == 0 {
            problems.push("page_size must be greater than 0".to_string());
        }
        if self.db_workers == 0 {
            problems.push("db_workers must be greater than 0".to_string());
        }
        if self.queue_capacity == 0 {
            problems.push("queue_capacity must be greater than 0".to_string());
        }
        if self.bind_address().parse::<std::net::SocketAddr>().is_err() {
            problems.push(format!("invalid listen address '{}'", self.bind_address()));
        }

        problems
    }

    /// Report which of the expected fields are absent from a raw YAML document.
    pub fn missing_fields(content: &str) -> AppResult<Vec<&'static str>> {
        let value: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| AppError::ConfigLoad(e.to_string()))?;

        let missing = EXPECTED_FIELDS
            .iter()
            .copied()
            .filter(|field| value.get(*field).is_none())
            .collect();

        Ok(missing)
    }

    /// Directory that holds the configuration file (and, by default, the database).
    fn base_dir(config_path: &Path) -> PathBuf {
        config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::config_dir)
    }

    /// Where a `--db` value points: absolute paths are kept, relative ones
    /// live next to the configuration file.
    pub fn resolve_database(custom_db: &str, config_path: &Path) -> PathBuf {
        let p = Path::new(custom_db);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            Self::base_dir(config_path).join(p)
        }
    }

    /// Initialize configuration and database files.
    ///
    /// Returns the configuration that was (or, in test mode, would have been) written.
    pub fn init_all(custom_db: Option<String>, config_path: &Path, is_test: bool) -> io::Result<Self> {
        let dir = Self::base_dir(config_path);
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = match custom_db {
            Some(name) => Self::resolve_database(&name, config_path),
            None => dir.join("entrybook.sqlite"),
        };

        let config = Self {
            database: db_path.to_string_lossy().to_string(),
            ..Self::default()
        };

        if !is_test {
            let yaml = serde_yaml::to_string(&config).map_err(io::Error::other)?;
            let mut file = fs::File::create(config_path)?;
            file.write_all(yaml.as_bytes())?;
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        Ok(config)
    }
}
