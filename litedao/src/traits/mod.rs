//! Core traits for litedao

mod connection;
mod field_source;
mod from_row;
mod from_value;
mod to_value;

pub use connection::{Connection, Connector, ResultSet};
pub use field_source::FieldSource;
pub use from_row::FromRow;
pub use from_value::FromValue;
pub use to_value::ToValue;
