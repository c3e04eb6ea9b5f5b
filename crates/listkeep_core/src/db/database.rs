//! Explicit owner of the store connection.
//!
//! # Responsibility
//! - Open the connection lazily, exactly once per context, and migrate it.
//! - Hand out the shared handle to repositories and services.
//! - Release the handle on `close` so tests can re-initialize.
//!
//! # Invariants
//! - `initialize` is idempotent: a second call returns the existing handle and
//!   never re-runs migrations.
//! - `connection` fails with `DbError::NotInitialized` before `initialize`.

use super::open::{open_db, open_db_in_memory};
use super::{DbError, DbResult};
use crate::config::StoreConfig;
use log::{debug, info, warn};
use rusqlite::Connection;
use std::time::Duration;

/// Process-lifetime database context.
///
/// Construct one at startup and pass `connection()` into every repository.
pub struct Database {
    config: StoreConfig,
    conn: Option<Connection>,
}

impl Database {
    /// Creates an unopened context. No I/O happens until [`Database::initialize`].
    pub fn new(config: StoreConfig) -> Self {
        Self { config, conn: None }
    }

    /// Opens the connection, enables foreign keys and applies migrations.
    ///
    /// Subsequent calls return the existing handle.
    ///
    /// # Errors
    /// - Any open or migration failure. Callers treat this as fatal.
    pub fn initialize(&mut self) -> DbResult<&Connection> {
        if self.conn.is_some() {
            debug!("event=db_initialize module=db status=skipped reason=already_open");
        } else {
            let conn = match self.config.db_path.as_ref() {
                Some(path) => open_db(
                    path,
                    Duration::from_millis(self.config.busy_timeout_ms),
                )?,
                None => open_db_in_memory()?,
            };
            self.conn = Some(conn);
        }
        self.connection()
    }

    /// Returns the open handle.
    pub fn connection(&self) -> DbResult<&Connection> {
        self.conn.as_ref().ok_or(DbError::NotInitialized)
    }

    pub fn is_initialized(&self) -> bool {
        self.conn.is_some()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Closes the handle and resets to the uninitialized state.
    ///
    /// Closing an uninitialized context is a no-op.
    pub fn close(&mut self) -> DbResult<()> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };
        match conn.close() {
            Ok(()) => {
                info!("event=db_close module=db status=ok");
                Ok(())
            }
            Err((conn, err)) => {
                warn!("event=db_close module=db status=error error={err}");
                self.conn = Some(conn);
                Err(err.into())
            }
        }
    }
}
