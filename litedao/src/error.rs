//! Error types for litedao

use thiserror::Error;

/// Result type alias for litedao operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during session operations
#[derive(Error, Debug)]
pub enum Error {
    /// MySQL driver error (connect, authenticate, execute)
    #[error("MySQL error: {0}")]
    MySql(#[from] mysql_async::Error),

    /// Invalid session configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error while reading configuration
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A value the converter refuses to render as a literal
    #[error("Cannot convert {type_name} to a SQL literal: {reason}")]
    Unconvertible {
        type_name: &'static str,
        reason: String,
    },

    /// Serialization of a record field failed
    #[error("Failed to serialize field `{column}`: {source}")]
    Serialization {
        column: String,
        #[source]
        source: Box<Error>,
    },

    /// Batch rows disagree on their field set
    #[error("Batch row {row} has fields {found:?}, expected {expected:?}")]
    Shape {
        row: usize,
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// A record names the same field twice
    #[error("Record {row} has duplicate field `{column}`")]
    DuplicateField { row: usize, column: String },

    /// Update payload without any non-null field
    #[error("Record for table `{0}` has no fields to write")]
    EmptyRecord(String),

    /// Type conversion error
    #[error("Type conversion error: expected {expected}, got {actual}")]
    TypeConversion {
        expected: &'static str,
        actual: String,
    },

    /// Column not found in row
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Null value for non-optional field
    #[error("Unexpected null value for column: {0}")]
    UnexpectedNull(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(String),

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Row decode error
    #[error("Failed to decode row: {0}")]
    RowDecode(String),
}
