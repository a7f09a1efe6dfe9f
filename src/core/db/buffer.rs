/// Column-Value Buffer Module
///
/// Holds one scanned row as an ordered list of (column name, value) pairs.
/// A buffer is sized once from the column list of a result set and then
/// overwritten in place for every row the cursor yields.

use rusqlite::types::ValueRef;
use serde_json::{Map, Value};

/// A single cell, tagged with SQLite's storage class.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl ColumnValue {
    /// Overwrites `self` with `value`, reusing the existing text or blob
    /// allocation when the storage class is unchanged.
    pub fn assign(&mut self, value: ValueRef<'_>) {
        match (&mut *self, value) {
            (slot @ ColumnValue::Text(_), ValueRef::Text(t)) => match (slot, std::str::from_utf8(t)) {
                (ColumnValue::Text(s), Ok(text)) => {
                    s.clear();
                    s.push_str(text);
                }
                (slot, _) => *slot = ColumnValue::Blob(t.to_vec()),
            },
            (ColumnValue::Blob(b), ValueRef::Blob(bytes)) => {
                b.clear();
                b.extend_from_slice(bytes);
            }
            (slot, value) => *slot = ColumnValue::from(value),
        }
    }

    /// Returns the SQLite storage class name, used in decode errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnValue::Null => "NULL",
            ColumnValue::Integer(_) => "INTEGER",
            ColumnValue::Real(_) => "REAL",
            ColumnValue::Text(_) => "TEXT",
            ColumnValue::Blob(_) => "BLOB",
        }
    }

    /// Renders the value as JSON. Blobs become arrays of byte values.
    pub fn to_json(&self) -> Value {
        match self {
            ColumnValue::Null => Value::Null,
            ColumnValue::Integer(i) => Value::from(*i),
            ColumnValue::Real(f) => Value::from(*f),
            ColumnValue::Text(s) => Value::from(s.as_str()),
            ColumnValue::Blob(b) => Value::from(b.clone()),
        }
    }
}

impl From<ValueRef<'_>> for ColumnValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => ColumnValue::Null,
            ValueRef::Integer(i) => ColumnValue::Integer(i),
            ValueRef::Real(f) => ColumnValue::Real(f),
            // TEXT that is not valid UTF-8 keeps its raw bytes
            ValueRef::Text(t) => match std::str::from_utf8(t) {
                Ok(s) => ColumnValue::Text(s.to_string()),
                Err(_) => ColumnValue::Blob(t.to_vec()),
            },
            ValueRef::Blob(b) => ColumnValue::Blob(b.to_vec()),
        }
    }
}

/// One row of column values, in result-set column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnBuffer {
    names: Vec<String>,
    values: Vec<ColumnValue>,
}

impl ColumnBuffer {
    /// Creates a buffer for the given columns with every value set to NULL.
    pub fn with_columns(names: Vec<String>) -> Self {
        let values = vec![ColumnValue::Null; names.len()];
        ColumnBuffer { names, values }
    }

    /// Creates a buffer from already materialized pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, ColumnValue)>,
        S: Into<String>,
    {
        let (names, values) = pairs.into_iter().map(|(n, v)| (n.into(), v)).unzip();
        ColumnBuffer { names, values }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[ColumnValue] {
        &self.values
    }

    /// Looks up a value by column name.
    pub fn get(&self, name: &str) -> Option<&ColumnValue> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.values[i])
    }

    /// Iterates over (column name, value) pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnValue)> {
        self.names.iter().map(String::as_str).zip(self.values.iter())
    }

    /// Overwrites the value at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds; cursors check the width first.
    pub(crate) fn set(&mut self, index: usize, value: ValueRef<'_>) {
        self.values[index].assign(value);
    }

    /// Renders the row as a JSON object keyed by column name.
    pub fn to_json(&self) -> Value {
        let object: Map<String, Value> = self
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_json()))
            .collect();
        Value::Object(object)
    }
}
