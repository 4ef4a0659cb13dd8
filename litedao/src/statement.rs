//! SQL text assembly for session operations
//!
//! Every function here is pure string building. Table names, select
//! fragments and `WHERE` conditions are inserted verbatim; values arrive
//! already rendered by the serializer.

use crate::serializer::{SerializedBatch, SerializedRecord};

/// Statement used to read back the generated key after an insert.
pub const LAST_INSERT_ID: &str = "SELECT LAST_INSERT_ID() AS id;";

/// Column alias used by [`LAST_INSERT_ID`].
pub const LAST_INSERT_ID_COLUMN: &str = "id";

fn where_clause(condition: Option<&str>) -> String {
    match condition.map(str::trim) {
        Some(cond) if !cond.is_empty() => format!(" WHERE {}", cond),
        _ => String::new(),
    }
}

/// `SELECT <fragment>[ LIMIT 1];`
///
/// Semicolons are stripped from the fragment.
pub fn select(fragment: &str, unique: bool) -> String {
    let fragment = fragment.replace(';', "");
    format!(
        "SELECT {}{};",
        fragment.trim(),
        if unique { " LIMIT 1" } else { "" }
    )
}

/// `INSERT INTO <table> (<cols>) VALUES (<vals>);`
pub fn insert(table: &str, record: &SerializedRecord) -> String {
    format!(
        "INSERT INTO {} ({}) VALUES ({});",
        table,
        record.columns.join(","),
        record.literals.join(",")
    )
}

/// `INSERT INTO <table> (<cols>) VALUES (<r1>),(<r2>),...;`
pub fn insert_many(table: &str, batch: &SerializedBatch) -> String {
    let rows = batch
        .rows
        .iter()
        .map(|row| format!("({})", row.join(",")))
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "INSERT INTO {} ({}) VALUES {};",
        table,
        batch.columns.join(","),
        rows
    )
}

/// `UPDATE <table> SET <col> = <val>,...[ WHERE <condition>];`
///
/// Without a condition this updates every row in the table.
pub fn update(table: &str, record: &SerializedRecord, condition: Option<&str>) -> String {
    let assignments = record
        .pairs()
        .map(|(column, literal)| format!("{} = {}", column, literal))
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "UPDATE {} SET {}{};",
        table,
        assignments,
        where_clause(condition)
    )
}

/// `DELETE FROM <table>[ WHERE <condition>];`
///
/// Without a condition this deletes every row in the table.
pub fn delete(table: &str, condition: Option<&str>) -> String {
    format!("DELETE FROM {}{};", table, where_clause(condition))
}

/// `SELECT <key or *> FROM <table>[ WHERE <condition>] LIMIT 1;`
pub fn exists_probe(table: &str, primary_key: Option<&str>, condition: Option<&str>) -> String {
    let key = primary_key
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .unwrap_or("*");
    format!(
        "SELECT {} FROM {}{} LIMIT 1;",
        key,
        table,
        where_clause(condition)
    )
}
