/// Database Module
///
/// The row access layer underneath the CRUD driver.
///
/// ## Architecture
///
/// - **Backend** (`backend.rs`): statement execution and cursor lifetime
/// - **Cursor** (`cursor.rs`): column discovery and row scanning
/// - **Buffer** (`buffer.rs`): the per-row scan target
///
/// ## Error Handling
///
/// Backend failures surface as `CrudError::Database` without rewording.
pub mod backend;
pub mod buffer;
pub mod cursor;

pub use backend::Backend;
pub use buffer::{ColumnBuffer, ColumnValue};
pub use cursor::{RowCursor, SqliteCursor};
