use crate::db::log::ttlog;
use crate::errors::{AppError, AppResult};
use crate::models::entry::{DATE_FORMAT, Entry, EntryData, format_date};
use crate::models::page::{Page, PageQuery};
use crate::models::reference::{OptionSet, Reference, ReferenceKind};
use chrono::NaiveDate;
use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

/// Outcome of a write against an existing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Applied(i64),
    NotFound,
}

impl Mutation {
    pub fn applied_id(&self) -> Option<i64> {
        match self {
            Mutation::Applied(id) => Some(*id),
            Mutation::NotFound => None,
        }
    }
}

const SELECT_ENTRY: &str = "
    SELECT e.id, e.name, e.start_date, e.end_date,
           e.vendor_id, v.name AS vendor_name,
           e.department_id, d.name AS department_name
    FROM entry e
    LEFT JOIN vendor v ON v.id = e.vendor_id
    LEFT JOIN department d ON d.id = e.department_id";

fn parse_stored_date(value: Option<String>) -> Result<Option<NaiveDate>> {
    match value {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => NaiveDate::parse_from_str(&s, DATE_FORMAT)
            .map(Some)
            .map_err(|_| {
                rusqlite::Error::FromSqlConversionFailure(
                    0,
                    rusqlite::types::Type::Text,
                    Box::new(AppError::InvalidDate(s.clone())),
                )
            }),
    }
}

fn reference(id: Option<i64>, name: Option<String>) -> Option<Reference> {
    match (id, name) {
        (Some(id), Some(name)) => Some(Reference { id, name }),
        _ => None,
    }
}

pub fn map_entry(row: &Row) -> Result<Entry> {
    Ok(Entry {
        id: row.get("id")?,
        name: row.get("name")?,
        start_date: parse_stored_date(row.get("start_date")?)?,
        end_date: parse_stored_date(row.get("end_date")?)?,
        vendor: reference(row.get("vendor_id")?, row.get("vendor_name")?),
        department: reference(row.get("department_id")?, row.get("department_name")?),
    })
}

fn nullable_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| format_date(Some(d)))
}

/// `%filter%` with LIKE wildcards in the user text escaped.
fn like_pattern(filter: &str) -> String {
    let mut out = String::with_capacity(filter.len() + 2);
    out.push('%');
    for c in filter.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

/// Register `casefold(text)`, a Unicode lowercase. SQLite's own `LIKE` and
/// `lower()` only fold ASCII. Every connection that runs [`page_entries`]
/// needs it.
pub fn register_functions(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        "casefold",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )
}

/// One page of entries, filtered on the name (case-insensitive) and sorted.
pub fn page_entries(conn: &Connection, query: &PageQuery) -> AppResult<Page<Entry>> {
    let pattern = like_pattern(&query.filter.to_lowercase());

    let total_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM entry e WHERE casefold(e.name) LIKE ?1 ESCAPE '\\'",
        [&pattern],
        |row| row.get(0),
    )?;

    let sql = format!(
        "{SELECT_ENTRY}
         WHERE casefold(e.name) LIKE ?1 ESCAPE '\\'
         ORDER BY {} {}, e.id {}
         LIMIT ?2 OFFSET ?3",
        query.sort.to_sql(),
        query.order.to_sql(),
        query.order.to_sql(),
    );

    let mut stmt = conn.prepare_cached(&sql)?;
    let offset = i64::try_from(query.offset()).unwrap_or(i64::MAX);
    let rows = stmt.query_map(
        params![pattern, i64::from(query.page_size), offset],
        map_entry,
    )?;

    let mut items = Vec::new();
    for r in rows {
        items.push(r?);
    }

    Ok(Page {
        items,
        page_index: query.page,
        page_size: query.page_size,
        total_count: u64::try_from(total_count).unwrap_or(0),
    })
}

pub fn find_entry(conn: &Connection, id: i64) -> AppResult<Option<Entry>> {
    let sql = format!("{SELECT_ENTRY} WHERE e.id = ?1");
    let mut stmt = conn.prepare_cached(&sql)?;
    Ok(stmt.query_row([id], map_entry).optional()?)
}

/// Insert with a caller-assigned id, logging the operation in the same transaction.
pub fn insert_entry(conn: &mut Connection, id: i64, data: &EntryData) -> AppResult<i64> {
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO entry (id, name, start_date, end_date, vendor_id, department_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            id,
            data.name,
            nullable_date(data.start_date),
            nullable_date(data.end_date),
            data.vendor_id,
            data.department_id,
        ],
    )?;
    ttlog(
        &tx,
        "create",
        &id.to_string(),
        &format!("Entry {} has been created", data.name),
    )?;
    tx.commit()?;
    Ok(id)
}

/// Copy the mutable fields onto an existing row; the id is never written.
pub fn update_entry(conn: &mut Connection, id: i64, data: &EntryData) -> AppResult<Mutation> {
    let tx = conn.transaction()?;

    let exists = tx
        .query_row("SELECT 1 FROM entry WHERE id = ?1", [id], |_| Ok(()))
        .optional()?
        .is_some();
    if !exists {
        return Ok(Mutation::NotFound);
    }

    tx.execute(
        "UPDATE entry
         SET name = ?1, start_date = ?2, end_date = ?3,
             vendor_id = ?4, department_id = ?5
         WHERE id = ?6",
        params![
            data.name,
            nullable_date(data.start_date),
            nullable_date(data.end_date),
            data.vendor_id,
            data.department_id,
            id,
        ],
    )?;
    ttlog(
        &tx,
        "update",
        &id.to_string(),
        &format!("Entry {} has been updated", data.name),
    )?;
    tx.commit()?;

    Ok(Mutation::Applied(id))
}

pub fn delete_entry(conn: &mut Connection, id: i64) -> AppResult<Mutation> {
    let tx = conn.transaction()?;

    let name: Option<String> = tx
        .query_row("SELECT name FROM entry WHERE id = ?1", [id], |row| row.get(0))
        .optional()?;
    let Some(name) = name else {
        return Ok(Mutation::NotFound);
    };

    tx.execute("DELETE FROM entry WHERE id = ?1", [id])?;
    ttlog(
        &tx,
        "delete",
        &id.to_string(),
        &format!("Entry {name} has been deleted"),
    )?;
    tx.commit()?;

    Ok(Mutation::Applied(id))
}

/// Highest stored entry id (0 on an empty table).
pub fn max_entry_id(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row("SELECT IFNULL(MAX(id), 0) FROM entry", [], |row| row.get(0))?)
}

/// `id → name` for a reference table, ordered by name.
pub fn load_options(conn: &Connection, kind: ReferenceKind) -> AppResult<OptionSet> {
    let sql = format!(
        "SELECT id, name FROM {} ORDER BY name COLLATE NOCASE ASC, id ASC",
        kind.table()
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut options = OptionSet::new();
    for r in rows {
        let (id, name) = r?;
        options.insert(id.to_string(), name);
    }
    Ok(options)
}

/// Add a reference row and return its id (used by seeding and tests).
pub fn insert_reference(conn: &Connection, kind: ReferenceKind, name: &str) -> AppResult<i64> {
    let sql = format!("INSERT INTO {} (name) VALUES (?1)", kind.table());
    conn.execute(&sql, [name])?;
    Ok(conn.last_insert_rowid())
}

pub fn count_rows(conn: &Connection, table: &str) -> AppResult<i64> {
    let sql = format!("SELECT COUNT(*) FROM {table}");
    Ok(conn.query_row(&sql, [], |row| row.get(0))?)
}
