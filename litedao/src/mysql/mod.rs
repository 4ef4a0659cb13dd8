//! MySQL implementation for litedao

mod connection;
mod row;
mod types;

pub use connection::{MySqlConnection, MySqlConnector};
pub use row::decode_row;
