//! Dynamic row decoding.
//!
//! Report scripts are opaque text, so result columns are not known at
//! compile time. Rows are decoded column-by-column into JSON maps,
//! dispatching on the MySQL type name. Anything unrecognized falls back
//! to a string decode of the raw value; a column that cannot be decoded
//! at all becomes JSON null rather than failing the statement.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::{Map, Value};
use sqlx::mysql::MySqlRow;
use sqlx::{Column, Row, TypeInfo};

/// Decode one row into a column-name -> JSON-value map.
pub fn row_to_json(row: &MySqlRow) -> Map<String, Value> {
    let mut map = Map::with_capacity(row.columns().len());
    for column in row.columns() {
        let value = decode_column(row, column.ordinal(), column.type_info().name());
        map.insert(column.name().to_string(), value);
    }
    map
}

fn decode_column(row: &MySqlRow, index: usize, type_name: &str) -> Value {
    let value = match type_name {
        "BOOLEAN" => row.try_get::<Option<bool>, _>(index).map(json_from),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            row.try_get::<Option<i64>, _>(index).map(json_from)
        }
        "YEAR" => row.try_get::<Option<u16>, _>(index).map(json_from),
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" => row.try_get::<Option<u64>, _>(index).map(json_from),
        "FLOAT" => row
            .try_get::<Option<f32>, _>(index)
            .map(|v| json_from(v.map(f64::from))),
        "DOUBLE" => row.try_get::<Option<f64>, _>(index).map(json_from),
        "DATE" => row
            .try_get::<Option<NaiveDate>, _>(index)
            .map(|v| json_string(v.map(|d| d.to_string()))),
        "TIME" => row
            .try_get::<Option<NaiveTime>, _>(index)
            .map(|v| json_string(v.map(|t| t.to_string()))),
        "DATETIME" => row
            .try_get::<Option<NaiveDateTime>, _>(index)
            .map(|v| json_string(v.map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string()))),
        "TIMESTAMP" => row
            .try_get::<Option<DateTime<Utc>>, _>(index)
            .map(|v| json_string(v.map(|dt| dt.to_rfc3339()))),
        "JSON" => row
            .try_get_unchecked::<Option<String>, _>(index)
            .map(|v| match v {
                Some(text) => serde_json::from_str(&text).unwrap_or(Value::String(text)),
                None => Value::Null,
            }),
        // CHAR/VARCHAR/TEXT/ENUM/DECIMAL and everything else: raw
        // string decode (DECIMAL crosses the wire as text).
        _ => row
            .try_get_unchecked::<Option<String>, _>(index)
            .map(json_string),
    };

    value.unwrap_or_else(|err| {
        tracing::debug!(column = index, type_name, error = %err, "Column decode failed");
        Value::Null
    })
}

fn json_from<T: Into<Value>>(value: Option<T>) -> Value {
    value.map(Into::into).unwrap_or(Value::Null)
}

fn json_string(value: Option<String>) -> Value {
    value.map(Value::String).unwrap_or(Value::Null)
}
