/// Record Codec Module
///
/// Turns a scanned `ColumnBuffer` into any caller record type that
/// implements `serde::Deserialize`. The buffer is presented to serde as a
/// map with one entry per column, so field names (or `#[serde(rename)]`
/// tags) select columns and the record type never has to be known here.
///
/// ## Value coercions
///
/// SQLite is loosely typed, so each cell is offered to the record in the
/// shape the record asks for:
/// - NULL decodes to `None` for `Option` fields and is an error elsewhere
/// - INTEGER decodes into booleans (`0` is false) and floats
/// - INTEGER and REAL decode into strings as decimal text
/// - TEXT holding a number or boolean decodes into numeric and bool fields
/// - BLOB decodes into byte buffers and `Vec<u8>`
/// - TEXT that is not valid UTF-8 arrives as BLOB, so string fields reject it
///
/// Columns with no matching field are skipped unless the record denies
/// unknown fields.

use crate::core::db::{ColumnBuffer, ColumnValue};
use crate::core::{CrudError, Result};
use serde::de::value::{SeqDeserializer, StrDeserializer};
use serde::de::{
    self, DeserializeOwned, DeserializeSeed, Deserializer, IntoDeserializer, MapAccess, Visitor,
};
use serde::forward_to_deserialize_any;
use std::fmt;
use tracing::error;

/// Decodes one row into `T`.
///
/// On failure the row is logged as a JSON object alongside the decoder's
/// message, and the same pair is returned in `CrudError::Decode`.
pub fn decode_row<T: DeserializeOwned>(buf: &ColumnBuffer) -> Result<T> {
    T::deserialize(RowDeserializer::new(buf)).map_err(|e| {
        let row = buf.to_json().to_string();
        error!("failed to decode row {}: {}", row, e);
        CrudError::Decode {
            message: e.0,
            row,
        }
    })
}

/// Error raised while decoding a row.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeError(String);

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for DecodeError {}

impl de::Error for DecodeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        DecodeError(msg.to_string())
    }
}

/// Presents a whole row as a serde map.
pub struct RowDeserializer<'a> {
    buf: &'a ColumnBuffer,
}

impl<'a> RowDeserializer<'a> {
    pub fn new(buf: &'a ColumnBuffer) -> Self {
        RowDeserializer { buf }
    }
}

impl<'de, 'a> Deserializer<'de> for RowDeserializer<'a> {
    type Error = DecodeError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> std::result::Result<V::Value, DecodeError> {
        visitor.visit_map(RowAccess {
            columns: self.buf.iter(),
            pending: None,
        })
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct map struct enum identifier ignored_any
    }
}

struct RowAccess<'a, I> {
    columns: I,
    pending: Option<(&'a str, &'a ColumnValue)>,
}

impl<'de, 'a, I> MapAccess<'de> for RowAccess<'a, I>
where
    I: Iterator<Item = (&'a str, &'a ColumnValue)>,
{
    type Error = DecodeError;

    fn next_key_seed<K>(&mut self, seed: K) -> std::result::Result<Option<K::Value>, DecodeError>
    where
        K: DeserializeSeed<'de>,
    {
        match self.columns.next() {
            Some((name, value)) => {
                self.pending = Some((name, value));
                let key: StrDeserializer<'_, DecodeError> = name.into_deserializer();
                seed.deserialize(key).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> std::result::Result<V::Value, DecodeError>
    where
        V: DeserializeSeed<'de>,
    {
        let (column, value) = self
            .pending
            .take()
            .ok_or_else(|| DecodeError("value requested before its column".to_string()))?;
        seed.deserialize(ValueDeserializer { value })
            .map_err(|e| DecodeError(format!("column `{}`: {}", column, e)))
    }

    fn size_hint(&self) -> Option<usize> {
        self.columns.size_hint().1
    }
}

/// Presents one cell to serde.
struct ValueDeserializer<'a> {
    value: &'a ColumnValue,
}

impl ValueDeserializer<'_> {
    fn parse_error(&self, expected: &str) -> DecodeError {
        DecodeError(format!(
            "cannot read {} value {:?} as {}",
            self.value.type_name(),
            self.value,
            expected
        ))
    }
}

macro_rules! deserialize_integer {
    ($($method:ident => $visit:ident : $ty:ty),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> std::result::Result<V::Value, DecodeError> {
                match self.value {
                    ColumnValue::Text(s) => match s.trim().parse::<$ty>() {
                        Ok(n) => visitor.$visit(n),
                        Err(_) => Err(self.parse_error(stringify!($ty))),
                    },
                    _ => self.deserialize_any(visitor),
                }
            }
        )*
    };
}

macro_rules! deserialize_float {
    ($($method:ident => $visit:ident : $ty:ty),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> std::result::Result<V::Value, DecodeError> {
                match self.value {
                    ColumnValue::Integer(i) => visitor.$visit(*i as $ty),
                    ColumnValue::Text(s) => match s.trim().parse::<$ty>() {
                        Ok(n) => visitor.$visit(n),
                        Err(_) => Err(self.parse_error(stringify!($ty))),
                    },
                    _ => self.deserialize_any(visitor),
                }
            }
        )*
    };
}

impl<'de, 'a> Deserializer<'de> for ValueDeserializer<'a> {
    type Error = DecodeError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> std::result::Result<V::Value, DecodeError> {
        match self.value {
            ColumnValue::Null => visitor.visit_unit(),
            ColumnValue::Integer(i) => visitor.visit_i64(*i),
            ColumnValue::Real(f) => visitor.visit_f64(*f),
            ColumnValue::Text(s) => visitor.visit_str(s),
            ColumnValue::Blob(b) => visitor.visit_seq(SeqDeserializer::new(b.iter().copied())),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> std::result::Result<V::Value, DecodeError> {
        match self.value {
            ColumnValue::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> std::result::Result<V::Value, DecodeError> {
        match self.value {
            ColumnValue::Integer(i) => visitor.visit_bool(*i != 0),
            ColumnValue::Text(s) => match s.trim() {
                "1" | "true" | "TRUE" | "True" => visitor.visit_bool(true),
                "0" | "false" | "FALSE" | "False" => visitor.visit_bool(false),
                _ => Err(self.parse_error("bool")),
            },
            _ => self.deserialize_any(visitor),
        }
    }

    deserialize_integer! {
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_i128 => visit_i128: i128,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_u128 => visit_u128: u128,
    }

    deserialize_float! {
        deserialize_f32 => visit_f32: f32,
        deserialize_f64 => visit_f64: f64,
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> std::result::Result<V::Value, DecodeError> {
        match self.value {
            ColumnValue::Integer(i) => visitor.visit_string(i.to_string()),
            ColumnValue::Real(f) => visitor.visit_string(f.to_string()),
            ColumnValue::Blob(b) => match std::str::from_utf8(b) {
                Ok(s) => visitor.visit_str(s),
                Err(_) => Err(self.parse_error("UTF-8 text")),
            },
            _ => self.deserialize_any(visitor),
        }
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> std::result::Result<V::Value, DecodeError> {
        self.deserialize_str(visitor)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> std::result::Result<V::Value, DecodeError> {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> std::result::Result<V::Value, DecodeError> {
        match self.value {
            ColumnValue::Blob(b) => visitor.visit_bytes(b),
            ColumnValue::Text(s) => visitor.visit_bytes(s.as_bytes()),
            _ => self.deserialize_any(visitor),
        }
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> std::result::Result<V::Value, DecodeError> {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> std::result::Result<V::Value, DecodeError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> std::result::Result<V::Value, DecodeError> {
        match self.value {
            ColumnValue::Text(s) => {
                let variant: StrDeserializer<'_, DecodeError> = s.as_str().into_deserializer();
                visitor.visit_enum(variant)
            }
            _ => Err(self.parse_error("enum variant")),
        }
    }

    forward_to_deserialize_any! {
        unit unit_struct seq tuple tuple_struct map struct identifier ignored_any
    }
}
