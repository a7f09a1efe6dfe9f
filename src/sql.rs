/// Statement Templates
///
/// Builds the SQL text issued by each driver operation. Table names,
/// column definitions, value lists and assignments are trusted fragments
/// and are substituted verbatim.

/// `CREATE TABLE IF NOT EXISTS` with the given column definitions.
pub fn create_table(table: &str, column_defs: &str) -> String {
    format!("CREATE TABLE IF NOT EXISTS {}(\n{}\n);", table, column_defs.trim())
}

pub fn drop_table(table: &str) -> String {
    format!("DROP TABLE {};", table)
}

/// `INSERT` of one row. `values` must already be SQL literals.
pub fn insert(table: &str, field_names: &str, values: &str) -> String {
    format!("INSERT INTO {}({}) VALUES({});", table, field_names, values)
}

pub fn select_all(table: &str) -> String {
    format!("SELECT * FROM {};", table)
}

/// Metadata-only query: reports the table's columns without reading rows.
pub fn select_columns(table: &str) -> String {
    format!("SELECT * FROM {} LIMIT 0;", table)
}

pub fn select_where(table: &str, column: &str, value: &str) -> String {
    format!("SELECT * FROM {} WHERE {} = {};", table, column, quote_literal(value))
}

/// `UPDATE` with pre-formatted assignments such as `name = 'x', n = 2`.
pub fn update_where(table: &str, assignments: &str, column: &str, value: &str) -> String {
    format!(
        "UPDATE {} SET {} WHERE {} = {};",
        table,
        assignments,
        column,
        quote_literal(value)
    )
}

pub fn delete_where(table: &str, column: &str, value: &str) -> String {
    format!("DELETE FROM {} WHERE {} = {};", table, column, quote_literal(value))
}

/// `DELETE ... IN (...)`. `list` is a comma-separated list of literals,
/// e.g. `1, 2, 3` or `'Article 1', 'Article 2'`.
pub fn delete_where_in(table: &str, column: &str, list: &str) -> String {
    format!("DELETE FROM {} WHERE {} IN ({});", table, column, list)
}

/// Renders `value` as a single-quoted SQL text literal.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
