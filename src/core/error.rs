/// Error Module
///
/// This module defines the error taxonomy surfaced by the CRUD driver.
/// Domain conditions (duplicate rows, missing rows, no-op updates and
/// deletes) are distinct variants so callers can match on them without
/// inspecting message text; every backend failure travels unchanged inside
/// `CrudError::Database`.
use thiserror::Error;

/// Error type for every operation in the crate.
///
/// The first five variants are domain conditions produced by the driver.
/// The rest are infrastructure failures:
/// - Backend (SQLite) errors, passed through verbatim
/// - Row shape mismatches between a cursor and its buffer
/// - Record decoding failures
/// - Configuration loading
#[derive(Error, Debug)]
pub enum CrudError {
    /// An insert violated a uniqueness constraint
    #[error("Duplicate row.")]
    DuplicateRow,

    /// A single-row read matched zero rows
    #[error("Row doesn't exist.")]
    RowNotExist,

    /// An update statement affected zero rows
    #[error("Row update failed.")]
    RowUpdateFailed,

    /// A delete statement affected zero rows
    #[error("Row deletion failed.")]
    RowDeleteFailed,

    /// Reserved for a create-on-demand policy. Nothing produces it yet.
    #[error("Table doesn't exist, created just now.")]
    TableNotExist,

    /// Errors from the SQLite backend
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A scan target whose width differs from the result set
    #[error("Column mismatch: buffer holds {expected} columns, result set has {found}")]
    ColumnMismatch { expected: usize, found: usize },

    /// A row that could not be decoded into the requested record type
    #[error("Decode error: {message} (row: {row})")]
    Decode { message: String, row: String },

    /// Configuration loading and validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system and I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON rendering errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CrudError {
    /// Returns `true` for the conditions the driver itself reports, as
    /// opposed to failures of the backend or of decoding.
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            CrudError::DuplicateRow
                | CrudError::RowNotExist
                | CrudError::RowUpdateFailed
                | CrudError::RowDeleteFailed
                | CrudError::TableNotExist
        )
    }

    /// Returns `true` if this is a SQLite uniqueness violation, either on a
    /// `UNIQUE` column or on the primary key.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            CrudError::Database(rusqlite::Error::SqliteFailure(err, _)) => matches!(
                err.extended_code,
                rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
            ),
            _ => false,
        }
    }
}

/// Type alias for Result to use CrudError as the error type.
pub type Result<T> = std::result::Result<T, CrudError>;
