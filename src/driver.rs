//! Generic CRUD driver over tables whose columns are discovered at run time.
//!
//! A `Driver<T>` is bound to one backend connection and decodes every row it
//! reads into `T`. Table names, column definitions and value lists are
//! trusted SQL fragments supplied by the caller.
use crate::core::codec::decode_row;
use crate::core::db::{Backend, ColumnBuffer};
use crate::core::{CrudError, Result};
use crate::sql;
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use tracing::{debug, warn};

/// Column name and comparison value identifying rows by equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryHook {
    pub name: String,
    pub value: String,
}

impl QueryHook {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        QueryHook {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// CRUD operations for record type `T` on backend `B`.
///
/// `B` is held by value; pass `&Connection` to share one connection between
/// drivers for different record types.
pub struct Driver<T, B = Connection> {
    backend: B,
    record: PhantomData<fn() -> T>,
}

impl<T, B> Driver<T, B>
where
    T: DeserializeOwned,
    B: Backend,
{
    pub fn new(backend: B) -> Self {
        Driver {
            backend,
            record: PhantomData,
        }
    }

    /// Creates `table` unless it already exists.
    ///
    /// # Arguments
    ///
    /// * `table` - Table name
    /// * `column_defs` - Column definitions, e.g. `id INTEGER PRIMARY KEY, name TEXT`
    pub fn init_db(&self, table: &str, column_defs: &str) -> Result<()> {
        self.backend.execute(&sql::create_table(table, column_defs))?;
        Ok(())
    }

    /// Drops `table`. Fails with the backend's error if it does not exist.
    pub fn drop_table(&self, table: &str) -> Result<()> {
        self.backend.execute(&sql::drop_table(table))?;
        Ok(())
    }

    /// Inserts one row.
    ///
    /// # Arguments
    ///
    /// * `table` - Table name
    /// * `field_names` - Comma-separated column list, e.g. `id, name`
    /// * `values` - Matching SQL literals, e.g. `1, 'indonesian'`
    ///
    /// # Errors
    ///
    /// `CrudError::DuplicateRow` if the row violates a uniqueness
    /// constraint; any other backend error unchanged.
    pub fn create_row(&self, table: &str, field_names: &str, values: &str) -> Result<()> {
        match self.backend.execute(&sql::insert(table, field_names, values)) {
            Ok(_) => Ok(()),
            Err(e) if e.is_unique_violation() => {
                warn!("duplicate row in {}: {}", table, e);
                Err(CrudError::DuplicateRow)
            }
            Err(e) => Err(e),
        }
    }

    /// Reads every row of `table` in result-set order.
    ///
    /// An empty table yields an empty `Vec`.
    pub fn read_all_rows(&self, table: &str) -> Result<Vec<T>> {
        self.backend.query(&sql::select_all(table), |cursor| {
            let mut buf = cursor.buffer();
            let mut all = Vec::new();
            while cursor.scan_into(&mut buf)? {
                all.push(decode_row(&buf)?);
            }
            debug!("read {} row(s) from {}", all.len(), table);
            Ok(all)
        })
    }

    /// Reads the row of `table` whose `hook.name` column equals `hook.value`.
    ///
    /// The column list is learned from a separate `LIMIT 0` query, closed
    /// before the row query opens. If several rows match, the first one in
    /// backend order is returned; use `read_all_rows` when the column is
    /// not unique.
    ///
    /// # Errors
    ///
    /// `CrudError::RowNotExist` if no row matches.
    pub fn read_row(&self, table: &str, hook: &QueryHook) -> Result<T> {
        let columns = self
            .backend
            .query(&sql::select_columns(table), |cursor| Ok(cursor.column_names().to_vec()))?;

        let statement = sql::select_where(table, &hook.name, &hook.value);
        self.backend.query(&statement, |cursor| {
            let mut buf = ColumnBuffer::with_columns(columns);
            if !cursor.scan_into(&mut buf)? {
                warn!("no row in {} where {} = {}", table, hook.name, hook.value);
                return Err(CrudError::RowNotExist);
            }
            decode_row(&buf)
        })
    }

    /// Updates the rows matching `hook`.
    ///
    /// # Arguments
    ///
    /// * `assignments` - Pre-formatted `SET` list, e.g. `name = 'french'`
    ///
    /// # Errors
    ///
    /// `CrudError::RowUpdateFailed` if no row was affected.
    pub fn update_row(&self, table: &str, assignments: &str, hook: &QueryHook) -> Result<()> {
        let statement = sql::update_where(table, assignments, &hook.name, &hook.value);
        self.expect_affected(&statement, CrudError::RowUpdateFailed)
    }

    /// Deletes the rows matching `hook`.
    ///
    /// # Errors
    ///
    /// `CrudError::RowDeleteFailed` if no row was affected.
    pub fn delete_row(&self, table: &str, hook: &QueryHook) -> Result<()> {
        let statement = sql::delete_where(table, &hook.name, &hook.value);
        self.expect_affected(&statement, CrudError::RowDeleteFailed)
    }

    /// Deletes every row whose `hook.name` column is in `hook.value`, a
    /// comma-separated literal list such as `1, 2, 3` or `'a', 'b'`.
    ///
    /// # Errors
    ///
    /// `CrudError::RowDeleteFailed` if no row was affected.
    pub fn delete_rows(&self, table: &str, hook: &QueryHook) -> Result<()> {
        let statement = sql::delete_where_in(table, &hook.name, &hook.value);
        self.expect_affected(&statement, CrudError::RowDeleteFailed)
    }

    fn expect_affected(&self, statement: &str, on_zero: CrudError) -> Result<()> {
        if self.backend.execute(statement)? == 0 {
            warn!("{}: {}", on_zero, statement);
            return Err(on_zero);
        }
        Ok(())
    }
}
