use crate::db::queries::count_rows;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RESET, YELLOW, color_for_count};
use rusqlite::Connection;
use std::fs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbInfo {
    pub path: String,
    pub file_size: u64,
    pub entries: i64,
    pub vendors: i64,
    pub departments: i64,
    pub log_rows: i64,
}

pub fn collect_db_info(conn: &Connection, db_path: &str) -> AppResult<DbInfo> {
    Ok(DbInfo {
        path: db_path.to_string(),
        file_size: fs::metadata(db_path).map(|m| m.len()).unwrap_or(0),
        entries: count_rows(conn, "entry")?,
        vendors: count_rows(conn, "vendor")?,
        departments: count_rows(conn, "department")?,
        log_rows: count_rows(conn, "log")?,
    })
}

pub fn print_db_info(info: &DbInfo) {
    println!();

    let file_mb = (info.file_size as f64) / (1024.0 * 1024.0);
    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, info.path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    println!("{}• Entries:{} {}{}{}", CYAN, RESET, GREEN, info.entries, RESET);
    println!(
        "{}• Vendors:{} {}{}{}",
        CYAN,
        RESET,
        color_for_count(info.vendors),
        info.vendors,
        RESET
    );
    println!(
        "{}• Departments:{} {}{}{}",
        CYAN,
        RESET,
        color_for_count(info.departments),
        info.departments,
        RESET
    );
    println!("{}• Log rows:{} {}", CYAN, RESET, info.log_rows);

    println!();
}
