//! Connection bootstrap for the customer database.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Apply connection pragmas and the configured busy timeout.
//! - Run schema migrations before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Returned connections have migrations fully applied.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use crate::config::{StoreConfig, StoreLocation, DEFAULT_BUSY_TIMEOUT_MS};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Opens (creating if needed) a customer database file.
///
/// Missing parent directories are created first.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_file(path.as_ref(), Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))
}

/// Opens a private in-memory customer database.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_memory(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))
}

/// Opens the database described by `config`.
pub fn open_with_config(config: &StoreConfig) -> DbResult<Connection> {
    match &config.location {
        StoreLocation::File { path } => open_file(path, config.busy_timeout()),
        StoreLocation::Memory => open_memory(config.busy_timeout()),
    }
}

fn open_file(path: &Path, busy_timeout: Duration) -> DbResult<Connection> {
    bootstrap("file", busy_timeout, || {
        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| DbError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        Ok(Connection::open(path)?)
    })
}

fn open_memory(busy_timeout: Duration) -> DbResult<Connection> {
    bootstrap("memory", busy_timeout, || Ok(Connection::open_in_memory()?))
}

/// Shared open path: logs one `db_open` start line and one outcome line.
fn bootstrap(
    mode: &'static str,
    busy_timeout: Duration,
    connect: impl FnOnce() -> DbResult<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let mut conn = match connect() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={err}",
                started_at.elapsed().as_millis()
            );
            return Err(err);
        }
    };

    if let Err(err) = configure_connection(&mut conn, busy_timeout) {
        error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_bootstrap_failed error={err}",
            started_at.elapsed().as_millis()
        );
        return Err(err);
    }

    info!(
        "event=db_open module=db status=ok mode={mode} duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

fn configure_connection(conn: &mut Connection, busy_timeout: Duration) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(busy_timeout)?;
    apply_migrations(conn)?;
    Ok(())
}
