//! FromRow trait for building entities from result rows

use crate::error::Result;
use crate::row::Row;

/// Trait for types that can be constructed from a result row.
///
/// This is the entity constructor used by [`Session::select_as`] and
/// [`Session::select_unique_as`]. It is typically implemented via
/// `#[derive(FromRow)]`, which reads each field by column name.
///
/// # Manual Implementation
///
/// ```ignore
/// use litedao::{FromRow, Row, Result};
///
/// pub struct User {
///     pub id: i64,
///     pub username: String,
/// }
///
/// impl FromRow for User {
///     fn from_row(row: &Row) -> Result<Self> {
///         Ok(Self {
///             id: row.get("id")?,
///             username: row.get("username")?,
///         })
///     }
/// }
/// ```
///
/// [`Session::select_as`]: crate::Session::select_as
/// [`Session::select_unique_as`]: crate::Session::select_unique_as
pub trait FromRow: Sized {
    /// Construct an instance of this type from a result row.
    fn from_row(row: &Row) -> Result<Self>;
}

impl FromRow for Row {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(row.clone())
    }
}
