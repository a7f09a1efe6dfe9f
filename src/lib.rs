//! Generic CRUD over SQLite tables whose columns are discovered at run
//! time, decoding each row into any `serde::Deserialize` record.

// Core infrastructure modules
pub mod core;

// Feature-specific modules
pub mod config;
pub mod driver;
pub mod sql;

#[cfg(test)]
pub(crate) mod test_utils;

pub use crate::core::{CrudError, Result};
pub use driver::{Driver, QueryHook};
