/// # Test Utilities Module
///
/// Shared fixtures for the unit tests: an in-memory connection seeded with
/// the `languages` table and the record type that maps onto it.

use rusqlite::Connection;
use serde::Deserialize;

pub const LANGUAGES_COLUMNS: &str = "id INTEGER PRIMARY KEY,\nname TEXT UNIQUE";

/// Record for the `languages` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Language {
    pub id: i64,
    pub name: String,
}

/// Opens an in-memory database with safe test defaults.
pub fn test_connection() -> Connection {
    let conn = Connection::open_in_memory().expect("open in-memory database");
    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;
        PRAGMA journal_mode = MEMORY;
    ",
    )
    .expect("apply test pragmas");
    conn
}

/// `languages(id INTEGER PRIMARY KEY, name TEXT UNIQUE)` seeded with
/// `(1, 'indonesian')`.
pub fn languages_fixture() -> Connection {
    let conn = test_connection();
    conn.execute_batch(&format!(
        "CREATE TABLE languages ({});
         INSERT INTO languages (id, name) VALUES (1, 'indonesian');",
        LANGUAGES_COLUMNS
    ))
    .expect("seed languages table");
    conn
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_languages_fixture_is_seeded() {
        let conn = languages_fixture();
        let name: String = conn
            .query_row("SELECT name FROM languages WHERE id = 1", [], |row| row.get(0))
            .unwrap();
        assert_eq!(name, "indonesian");
    }
}
