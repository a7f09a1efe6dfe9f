/// Backend Module
///
/// The driver talks to the database only through the `Backend` trait: one
/// call that runs a statement and reports the affected row count, and one
/// that opens a cursor for the duration of a closure.

use super::cursor::{RowCursor, SqliteCursor};
use crate::core::Result;
use rusqlite::Connection;
use tracing::debug;

/// SQL execution backend.
pub trait Backend {
    /// Executes a statement that returns no rows.
    ///
    /// # Returns
    ///
    /// The number of rows inserted, updated, or deleted.
    fn execute(&self, sql: &str) -> Result<usize>;

    /// Runs a query and hands its cursor to `f`.
    ///
    /// The cursor is closed when `f` returns, before `query` does, so a
    /// caller never holds more than the one iterator it asked for.
    fn query<R, F>(&self, sql: &str, f: F) -> Result<R>
    where
        F: FnOnce(&mut dyn RowCursor) -> Result<R>;
}

impl<B: Backend> Backend for &B {
    fn execute(&self, sql: &str) -> Result<usize> {
        (**self).execute(sql)
    }

    fn query<R, F>(&self, sql: &str, f: F) -> Result<R>
    where
        F: FnOnce(&mut dyn RowCursor) -> Result<R>,
    {
        (**self).query(sql, f)
    }
}

impl Backend for Connection {
    fn execute(&self, sql: &str) -> Result<usize> {
        debug!("execute: {}", sql);
        let affected = Connection::execute(self, sql, [])?;
        debug!("{} row(s) affected", affected);
        Ok(affected)
    }

    fn query<R, F>(&self, sql: &str, f: F) -> Result<R>
    where
        F: FnOnce(&mut dyn RowCursor) -> Result<R>,
    {
        debug!("query: {}", sql);
        let mut stmt = self.prepare(sql)?;
        let mut cursor = SqliteCursor::open(&mut stmt)?;
        f(&mut cursor)
    }
}
