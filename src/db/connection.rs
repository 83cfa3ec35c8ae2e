use std::fs;
use std::path::Path;

use rusqlite::Connection;

use crate::error::FptError;

use super::migrations;

/// Open the database at `path`, creating it and its schema if needed.
pub fn open_db(path: &Path) -> Result<Connection, FptError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            FptError::database(format!("Cannot create {}: {e}", parent.display()))
        })?;
    }
    log::trace!("Connecting to SQLite DB at {}", path.display());
    let conn = Connection::open(path)?;
    configure_connection(&conn)?;
    migrations::run_migrations(&conn)?;
    log::trace!("Connection to SQLite DB successful");
    Ok(conn)
}

/// Fresh in-memory store with the full schema.
pub fn open_in_memory() -> Result<Connection, FptError> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

/// Run `f` inside `BEGIN IMMEDIATE`, committing on success and rolling back
/// on any error.
pub fn with_transaction<T>(
    conn: &Connection,
    f: impl FnOnce(&Connection) -> Result<T, FptError>,
) -> Result<T, FptError> {
    conn.execute_batch("BEGIN IMMEDIATE")?;
    match f(conn) {
        Ok(value) => {
            conn.execute_batch("COMMIT")?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback) = conn.execute_batch("ROLLBACK") {
                log::warn!("Rollback failed: {rollback}");
            }
            Err(e)
        }
    }
}

fn configure_connection(conn: &Connection) -> Result<(), FptError> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA busy_timeout=5000;
         PRAGMA foreign_keys=ON;",
    )?;
    Ok(())
}
