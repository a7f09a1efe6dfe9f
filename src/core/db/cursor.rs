/// Row Cursor Module
///
/// A cursor walks the rows of one open result set and copies each row into
/// a caller-owned `ColumnBuffer`. Column names are read from the result set
/// itself, so nothing about the table has to be known in advance.

use super::buffer::ColumnBuffer;
use crate::core::{CrudError, Result};
use rusqlite::{Rows, Statement};

/// An open result set.
pub trait RowCursor {
    /// Ordered column names of the current result set.
    fn column_names(&self) -> &[String];

    /// Advances one row and overwrites `buf` with its values.
    ///
    /// Returns `Ok(false)` once the result set is exhausted. The buffer must
    /// have exactly as many columns as the result set.
    fn scan_into(&mut self, buf: &mut ColumnBuffer) -> Result<bool>;

    /// Allocates a buffer shaped for this cursor.
    fn buffer(&self) -> ColumnBuffer {
        ColumnBuffer::with_columns(self.column_names().to_vec())
    }
}

/// Cursor over a prepared SQLite statement.
pub struct SqliteCursor<'stmt> {
    columns: Vec<String>,
    rows: Rows<'stmt>,
}

impl<'stmt> SqliteCursor<'stmt> {
    /// Runs `stmt` and positions the cursor before the first row.
    pub fn open(stmt: &'stmt mut Statement<'_>) -> Result<Self> {
        let columns = stmt.column_names().into_iter().map(String::from).collect();
        let rows = stmt.query([])?;
        Ok(SqliteCursor { columns, rows })
    }
}

impl RowCursor for SqliteCursor<'_> {
    fn column_names(&self) -> &[String] {
        &self.columns
    }

    fn scan_into(&mut self, buf: &mut ColumnBuffer) -> Result<bool> {
        if buf.len() != self.columns.len() {
            return Err(CrudError::ColumnMismatch {
                expected: buf.len(),
                found: self.columns.len(),
            });
        }

        match self.rows.next()? {
            Some(row) => {
                for i in 0..self.columns.len() {
                    buf.set(i, row.get_ref(i)?);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
