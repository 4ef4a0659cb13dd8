//! Cursor over a session's live connection

use std::collections::VecDeque;

use tracing::debug;

use crate::error::Result;
use crate::row::Row;
use crate::traits::{Connection, ResultSet};

/// Executes statements on a borrowed connection and hands out result rows.
///
/// Each row is an ordered column-name → value mapping. The cursor borrows
/// the session mutably, so the session cannot be closed or reused while a
/// cursor is alive.
///
/// Results are buffered: a statement's rows are read in full by
/// [`execute`](Self::execute) and then drained with the `fetch_*` methods.
pub struct Cursor<'c, C: Connection> {
    conn: &'c mut C,
    columns: Vec<String>,
    rows: VecDeque<Row>,
    rows_affected: u64,
    last_insert_id: Option<u64>,
}

impl<'c, C: Connection> Cursor<'c, C> {
    pub(crate) fn new(conn: &'c mut C) -> Self {
        Self {
            conn,
            columns: Vec::new(),
            rows: VecDeque::new(),
            rows_affected: 0,
            last_insert_id: None,
        }
    }

    /// Execute one statement, replacing any unread rows from the previous
    /// one. Returns the number of affected rows.
    pub async fn execute(&mut self, sql: &str) -> Result<u64> {
        debug!(sql, "Executing statement");
        let ResultSet {
            columns,
            rows,
            rows_affected,
            last_insert_id,
        } = self.conn.query(sql).await?;

        self.columns = columns;
        self.rows = rows.into();
        self.rows_affected = rows_affected;
        self.last_insert_id = last_insert_id;
        Ok(rows_affected)
    }

    /// Take the next row, if any.
    pub fn fetch_one(&mut self) -> Option<Row> {
        self.rows.pop_front()
    }

    /// Take up to `n` rows.
    pub fn fetch_many(&mut self, n: usize) -> Vec<Row> {
        let n = n.min(self.rows.len());
        self.rows.drain(..n).collect()
    }

    /// Take every remaining row.
    pub fn fetch_all(&mut self) -> Vec<Row> {
        self.rows.drain(..).collect()
    }

    /// Rows affected by the last statement.
    pub fn rows_affected(&self) -> u64 {
        self.rows_affected
    }

    /// Last insert ID reported for the last statement.
    pub fn last_insert_id(&self) -> Option<u64> {
        self.last_insert_id
    }

    /// Column names of the last result, in order (empty when no row came back).
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows not yet fetched.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}
