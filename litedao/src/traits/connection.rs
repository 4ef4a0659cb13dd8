//! Driver seam: connectors and live connections

use crate::config::SessionConfig;
use crate::error::Result;
use crate::row::Row;
use async_trait::async_trait;

/// Outcome of one executed statement.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// Column names of the result, in server order (empty for writes)
    pub columns: Vec<String>,
    /// Fetched rows
    pub rows: Vec<Row>,
    /// Number of rows affected by the statement
    pub rows_affected: u64,
    /// Last insert ID reported by the server (for INSERT statements)
    pub last_insert_id: Option<u64>,
}

/// A live connection to the database.
///
/// Statements are plain SQL text with every value already inlined; there is
/// no parameter binding at this boundary. Errors from the underlying driver
/// are returned unchanged.
#[async_trait]
pub trait Connection: Send + Sized {
    /// Execute one statement and buffer its full result.
    async fn query(&mut self, sql: &str) -> Result<ResultSet>;

    /// Commit the current transaction.
    async fn commit(&mut self) -> Result<()>;

    /// Roll back the current transaction.
    async fn rollback(&mut self) -> Result<()>;

    /// Release the connection.
    async fn close(self) -> Result<()>;
}

/// Opens new connections from a [`SessionConfig`].
///
/// [`MySqlConnector`](crate::MySqlConnector) is the production implementation;
/// other implementations let a [`Session`](crate::Session) run against any
/// driver that can execute literal SQL.
#[async_trait]
pub trait Connector: Send + Sync {
    /// The connection type produced by this connector.
    type Connection: Connection;

    /// Establish a new connection.
    async fn connect(&self, config: &SessionConfig) -> Result<Self::Connection>;
}
