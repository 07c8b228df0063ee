//! Dynamically typed SQL values
//!
//! [`SqlValue`] is the currency between the converter, the filter builder,
//! and the repository engine: every parameter bound into a statement and
//! every column read out of a row passes through it. The JSON bridge
//! re-types temporal and uuid strings so that values which serde flattened
//! to text still bind against `date`/`timestamptz`/`uuid` columns.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, TypeInfo};
use uuid::Uuid;

use crate::errors::StoreError;

/// A row as the engine sees it: column name to value, ordered by name.
pub type RowMap = BTreeMap<String, SqlValue>;

/// A single SQL-typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Uuid(Uuid),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(DateTime<Utc>),
    Json(Value),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Lift a serde-produced JSON value into a SQL value. Strings are
    /// sniffed for temporal and uuid payloads; arrays and objects stay
    /// JSON and bind against `json`/`jsonb` columns.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => SqlValue::Null,
            Value::Bool(b) => SqlValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    SqlValue::Int(i)
                } else if let Some(f) = n.as_f64() {
                    SqlValue::Float(f)
                } else {
                    SqlValue::Text(n.to_string())
                }
            }
            Value::String(s) => SqlValue::from_text(s),
            other => SqlValue::Json(other),
        }
    }

    fn from_text(s: String) -> Self {
        if let Ok(ts) = DateTime::parse_from_rfc3339(&s) {
            return SqlValue::Timestamp(ts.with_timezone(&Utc));
        }
        if let Ok(date) = NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
            return SqlValue::Date(date);
        }
        if let Ok(time) = NaiveTime::parse_from_str(&s, "%H:%M:%S%.f") {
            return SqlValue::Time(time);
        }
        if let Ok(uuid) = Uuid::parse_str(&s) {
            return SqlValue::Uuid(uuid);
        }
        SqlValue::Text(s)
    }

    /// Render back into JSON in the exact textual forms chrono's serde
    /// support deserializes, so a decoded row can rebuild a record.
    /// Raw bytes become text (lossy) since records model `bytea` columns
    /// as strings.
    pub fn to_json(&self) -> Value {
        match self {
            SqlValue::Null => Value::Null,
            SqlValue::Bool(b) => Value::Bool(*b),
            SqlValue::Int(i) => Value::from(*i),
            SqlValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            SqlValue::Text(s) => Value::String(s.clone()),
            SqlValue::Bytes(b) => Value::String(String::from_utf8_lossy(b).into_owned()),
            SqlValue::Uuid(u) => Value::String(u.to_string()),
            SqlValue::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
            SqlValue::Time(t) => Value::String(t.format("%H:%M:%S%.f").to_string()),
            SqlValue::Timestamp(ts) => Value::String(ts.to_rfc3339()),
            SqlValue::Json(v) => v.clone(),
        }
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v.into())
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

// String conversions sniff like the JSON bridge does, so a date literal
// handed to a filter binds as `date`, not text.
impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::from_text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::from_text(v)
    }
}

impl From<Uuid> for SqlValue {
    fn from(v: Uuid) -> Self {
        SqlValue::Uuid(v)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        SqlValue::Date(v)
    }
}

impl From<NaiveTime> for SqlValue {
    fn from(v: NaiveTime) -> Self {
        SqlValue::Time(v)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(v: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(v)
    }
}

impl<T> From<Option<T>> for SqlValue
where
    T: Into<SqlValue>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => SqlValue::Null,
        }
    }
}

/// Bind a [`SqlValue`] into a sqlx query builder with its native SQL type.
/// NULL binds as a typed `Option` so the driver still sends a parameter.
macro_rules! bind_sql_value {
    ($query:expr, $value:expr) => {
        match $value {
            $crate::value::SqlValue::Null => $query.bind(Option::<String>::None),
            $crate::value::SqlValue::Bool(b) => $query.bind(b),
            $crate::value::SqlValue::Int(i) => $query.bind(i),
            $crate::value::SqlValue::Float(f) => $query.bind(f),
            $crate::value::SqlValue::Text(s) => $query.bind(s),
            $crate::value::SqlValue::Bytes(b) => $query.bind(b),
            $crate::value::SqlValue::Uuid(u) => $query.bind(u),
            $crate::value::SqlValue::Date(d) => $query.bind(d),
            $crate::value::SqlValue::Time(t) => $query.bind(t),
            $crate::value::SqlValue::Timestamp(ts) => $query.bind(ts),
            $crate::value::SqlValue::Json(v) => $query.bind(v),
        }
    };
}
pub(crate) use bind_sql_value;

fn decode_column<'r, T>(row: &'r PgRow, idx: usize, table: &str) -> Result<Option<T>, StoreError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get::<Option<T>, _>(idx)
        .map_err(|e| StoreError::from_sqlx("decode", table, e))
}

/// Decode a result row into a [`RowMap`], dispatching on the column type
/// reported by the driver. The column set is whatever the statement
/// returned; no catalog round-trip is needed.
pub(crate) fn decode_row(table: &str, row: &PgRow) -> Result<RowMap, StoreError> {
    let mut map = RowMap::new();
    for (idx, column) in row.columns().iter().enumerate() {
        let name = column.name().to_string();
        let value = match column.type_info().name() {
            "INT2" => decode_column::<i16>(row, idx, table)?
                .map_or(SqlValue::Null, |v| SqlValue::Int(v.into())),
            "INT4" => decode_column::<i32>(row, idx, table)?
                .map_or(SqlValue::Null, |v| SqlValue::Int(v.into())),
            "INT8" => decode_column::<i64>(row, idx, table)?.map_or(SqlValue::Null, SqlValue::Int),
            "FLOAT4" => decode_column::<f32>(row, idx, table)?
                .map_or(SqlValue::Null, |v| SqlValue::Float(v.into())),
            "FLOAT8" => {
                decode_column::<f64>(row, idx, table)?.map_or(SqlValue::Null, SqlValue::Float)
            }
            "BOOL" => decode_column::<bool>(row, idx, table)?.map_or(SqlValue::Null, SqlValue::Bool),
            "TEXT" | "VARCHAR" | "CHAR" | "BPCHAR" | "NAME" => {
                decode_column::<String>(row, idx, table)?.map_or(SqlValue::Null, SqlValue::Text)
            }
            "UUID" => decode_column::<Uuid>(row, idx, table)?.map_or(SqlValue::Null, SqlValue::Uuid),
            "DATE" => decode_column::<NaiveDate>(row, idx, table)?
                .map_or(SqlValue::Null, SqlValue::Date),
            "TIME" => decode_column::<NaiveTime>(row, idx, table)?
                .map_or(SqlValue::Null, SqlValue::Time),
            "TIMESTAMP" => decode_column::<chrono::NaiveDateTime>(row, idx, table)?
                .map_or(SqlValue::Null, |v| SqlValue::Timestamp(v.and_utc())),
            "TIMESTAMPTZ" => decode_column::<DateTime<Utc>>(row, idx, table)?
                .map_or(SqlValue::Null, SqlValue::Timestamp),
            "BYTEA" => {
                decode_column::<Vec<u8>>(row, idx, table)?.map_or(SqlValue::Null, SqlValue::Bytes)
            }
            "JSON" | "JSONB" => {
                decode_column::<Value>(row, idx, table)?.map_or(SqlValue::Null, SqlValue::Json)
            }
            other => {
                // Last resort for types outside the dispatch table: text if
                // the driver can coerce, then raw bytes.
                if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
                    v.map_or(SqlValue::Null, SqlValue::Text)
                } else if let Ok(v) = row.try_get::<Option<Vec<u8>>, _>(idx) {
                    v.map_or(SqlValue::Null, SqlValue::Bytes)
                } else {
                    return Err(StoreError::UnsupportedColumn {
                        table: table.to_string(),
                        column: name,
                        type_name: other.to_string(),
                    });
                }
            }
        };
        map.insert(name, value);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sniffs_dates_out_of_strings() {
        assert_eq!(
            SqlValue::from_json(json!("2005-04-07")),
            SqlValue::Date(NaiveDate::from_ymd_opt(2005, 4, 7).unwrap())
        );
    }

    #[test]
    fn sniffs_timestamps_out_of_strings() {
        let value = SqlValue::from_json(json!("2024-09-01T10:30:00Z"));
        match value {
            SqlValue::Timestamp(ts) => assert_eq!(ts.to_rfc3339(), "2024-09-01T10:30:00+00:00"),
            other => panic!("expected timestamp, got {other:?}"),
        }
    }

    #[test]
    fn sniffs_times_and_uuids() {
        assert_eq!(
            SqlValue::from_json(json!("14:30:00")),
            SqlValue::Time(NaiveTime::from_hms_opt(14, 30, 0).unwrap())
        );
        let uuid = Uuid::new_v4();
        assert_eq!(
            SqlValue::from_json(json!(uuid.to_string())),
            SqlValue::Uuid(uuid)
        );
    }

    #[test]
    fn ordinary_strings_stay_text() {
        assert_eq!(
            SqlValue::from_json(json!("Rachmaninoff")),
            SqlValue::Text("Rachmaninoff".to_string())
        );
    }

    #[test]
    fn numbers_split_into_int_and_float() {
        assert_eq!(SqlValue::from_json(json!(42)), SqlValue::Int(42));
        assert_eq!(SqlValue::from_json(json!(99.5)), SqlValue::Float(99.5));
    }

    #[test]
    fn arrays_and_objects_stay_json() {
        let value = SqlValue::from_json(json!({"a": 1}));
        assert!(matches!(value, SqlValue::Json(_)));
    }

    #[test]
    fn bytes_render_as_text() {
        let value = SqlValue::Bytes(b"John".to_vec());
        assert_eq!(value.to_json(), json!("John"));
    }

    #[test]
    fn temporal_json_roundtrip() {
        for raw in [json!("2005-04-07"), json!("2024-09-01T10:30:00+00:00")] {
            let value = SqlValue::from_json(raw.clone());
            assert_eq!(value.to_json(), raw);
        }
    }

    #[test]
    fn nan_renders_as_null() {
        assert_eq!(SqlValue::Float(f64::NAN).to_json(), Value::Null);
    }
}
