#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::path::Path;
use tempfile::TempDir;

pub fn eb() -> Command {
    cargo_bin_cmd!("entrybook")
}

/// A fresh temp directory holding the test database and config file.
pub struct TestEnv {
    pub dir: TempDir,
    pub db_path: String,
    pub config_path: String,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let db_path = path_str(&dir.path().join("entrybook.sqlite"));
        let config_path = path_str(&dir.path().join("entrybook.conf"));
        Self {
            dir,
            db_path,
            config_path,
        }
    }

    /// `entrybook --db <db> --config <conf> <args…>`
    pub fn cmd(&self, args: &[&str]) -> Command {
        let mut cmd = eb();
        cmd.args(["--db", &self.db_path, "--config", &self.config_path]);
        cmd.args(args);
        cmd
    }

    /// Initialize the schema without writing a configuration file.
    pub fn init(&self) {
        self.cmd(&["--test", "init"]).assert().success();
    }
}

fn path_str(p: &Path) -> String {
    p.to_string_lossy().to_string()
}
