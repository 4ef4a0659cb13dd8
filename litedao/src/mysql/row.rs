//! MySQL row decoding

use crate::error::{Error, Result};
use crate::row::Row;
use mysql_async::Row as MySqlAsyncRow;

use super::types::from_mysql_value;

/// Decode a mysql_async row into an ordered [`Row`].
pub fn decode_row(row: MySqlAsyncRow) -> Result<Row> {
    let columns = row.columns_ref();
    let mut decoded = Row::new();

    for (i, column) in columns.iter().enumerate() {
        let column_name = column.name_str().to_string();
        let mysql_value = row
            .as_ref(i)
            .ok_or_else(|| {
                Error::RowDecode(format!("value for column `{}` already taken", column_name))
            })?
            .clone();
        let value = from_mysql_value(column, mysql_value)?;
        decoded.insert(column_name, value);
    }

    Ok(decoded)
}

/// Column names of a mysql_async row, in server order.
pub fn column_names(row: &MySqlAsyncRow) -> Vec<String> {
    row.columns_ref()
        .iter()
        .map(|c| c.name_str().to_string())
        .collect()
}
