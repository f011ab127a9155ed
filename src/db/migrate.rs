use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists; migrations are tracked in it.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "0001_reference_tables",
        description: "Created vendor and department tables",
        sql: r#"
            CREATE TABLE IF NOT EXISTS vendor (
                id    INTEGER PRIMARY KEY,
                name  TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS department (
                id    INTEGER PRIMARY KEY,
                name  TEXT NOT NULL
            );
        "#,
    },
    Migration {
        version: "0002_entry_table",
        description: "Created entry table",
        sql: r#"
            CREATE TABLE IF NOT EXISTS entry (
                id          INTEGER PRIMARY KEY,
                name        TEXT NOT NULL,
                start_date  TEXT,
                end_date    TEXT,
                vendor_id   INTEGER REFERENCES vendor(id) ON DELETE SET NULL
            );

            CREATE INDEX IF NOT EXISTS idx_entry_name ON entry(name COLLATE NOCASE);
            CREATE INDEX IF NOT EXISTS idx_entry_vendor ON entry(vendor_id);
        "#,
    },
    Migration {
        version: "0003_entry_department",
        description: "Added department link to entry",
        sql: r#"
            ALTER TABLE entry ADD COLUMN department_id INTEGER
                REFERENCES department(id) ON DELETE SET NULL;

            CREATE INDEX IF NOT EXISTS idx_entry_department ON entry(department_id);
        "#,
    },
];

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Versions already recorded in the log table, oldest first.
pub fn applied_versions(conn: &Connection) -> Result<Vec<String>> {
    ensure_log_table(conn)?;
    let mut stmt = conn.prepare(
        "SELECT target FROM log WHERE operation = 'migration_applied' ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Public entry point: run all pending migrations.
///
/// Each step runs in its own transaction together with its `migration_applied` row.
/// Returns the number of migrations applied by this call.
pub fn run_pending_migrations(conn: &mut Connection) -> Result<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }

        let tx = conn.transaction()?;
        tx.execute_batch(m.sql)?;
        tx.execute(
            "INSERT INTO log (date, operation, target, message)
             VALUES (?1, 'migration_applied', ?2, ?3)",
            rusqlite::params![chrono::Local::now().to_rfc3339(), m.version, m.description],
        )?;
        tx.commit()?;

        tracing::info!(version = m.version, "{}", m.description);
        applied += 1;
    }

    Ok(applied)
}
