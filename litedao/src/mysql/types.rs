//! Type conversion utilities for MySQL

use crate::error::{Error, Result};
use crate::value::Value;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use mysql_async::consts::{ColumnFlags, ColumnType};
use mysql_async::{Column, Value as MySqlValue};
use rust_decimal::Decimal;

/// Convert a mysql_async value to a litedao Value.
///
/// Statements run over the text protocol, where every non-null column
/// arrives as bytes; the column metadata decides how those bytes are read.
pub fn from_mysql_value(column: &Column, value: MySqlValue) -> Result<Value> {
    match value {
        MySqlValue::NULL => Ok(Value::Null),
        MySqlValue::Bytes(bytes) => Ok(decode_text(column, bytes)),
        other => Err(Error::RowDecode(format!(
            "column `{}` returned binary-protocol value {:?}",
            column.name_str(),
            other
        ))),
    }
}

/// Decode a text-protocol cell by column type.
///
/// Anything that fails to parse (zero dates, out-of-range TIME values) is
/// kept as the server's text rather than failing the whole row.
fn decode_text(column: &Column, bytes: Vec<u8>) -> Value {
    if column.column_type() == ColumnType::MYSQL_TYPE_BIT {
        return Value::U64(bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b)));
    }

    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => return Value::Bytes(e.into_bytes()),
    };
    let unsigned = column.flags().contains(ColumnFlags::UNSIGNED_FLAG);

    let parsed = match column.column_type() {
        ColumnType::MYSQL_TYPE_TINY
        | ColumnType::MYSQL_TYPE_SHORT
        | ColumnType::MYSQL_TYPE_INT24
        | ColumnType::MYSQL_TYPE_LONG
        | ColumnType::MYSQL_TYPE_LONGLONG
        | ColumnType::MYSQL_TYPE_YEAR => {
            if unsigned {
                text.parse().ok().map(Value::U64)
            } else {
                text.parse().ok().map(Value::I64)
            }
        }
        ColumnType::MYSQL_TYPE_FLOAT => text.parse().ok().map(Value::F32),
        ColumnType::MYSQL_TYPE_DOUBLE => text.parse().ok().map(Value::F64),
        ColumnType::MYSQL_TYPE_DECIMAL | ColumnType::MYSQL_TYPE_NEWDECIMAL => {
            text.parse::<Decimal>().ok().map(Value::Decimal)
        }
        ColumnType::MYSQL_TYPE_DATE | ColumnType::MYSQL_TYPE_NEWDATE => {
            NaiveDate::parse_from_str(&text, "%Y-%m-%d").ok().map(Value::Date)
        }
        ColumnType::MYSQL_TYPE_DATETIME
        | ColumnType::MYSQL_TYPE_DATETIME2
        | ColumnType::MYSQL_TYPE_TIMESTAMP
        | ColumnType::MYSQL_TYPE_TIMESTAMP2 => {
            NaiveDateTime::parse_from_str(&text, "%Y-%m-%d %H:%M:%S%.f")
                .ok()
                .map(Value::DateTime)
        }
        ColumnType::MYSQL_TYPE_TIME | ColumnType::MYSQL_TYPE_TIME2 => {
            NaiveTime::parse_from_str(&text, "%H:%M:%S%.f")
                .ok()
                .map(Value::Time)
        }
        ColumnType::MYSQL_TYPE_JSON => serde_json::from_str(&text).ok().map(Value::Json),
        _ => None,
    };

    parsed.unwrap_or(Value::String(text))
}
