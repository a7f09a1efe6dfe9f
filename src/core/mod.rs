/// Core Module
///
/// The building blocks the driver is assembled from: the row access layer,
/// the record codec, and the error taxonomy.

pub mod codec;
pub mod db;
pub mod error;

// Re-export commonly used types for convenience
pub use error::{CrudError, Result};
