//! Derive macros for litedao
//!
//! This crate provides the following derive macros:
//! - `FromRow` - Builds a struct from a result row
//! - `FieldSource` - Turns a struct into an insert/update record
//!
//! These macros are re-exported from the `litedao` crate, so users typically
//! don't need to depend on this crate directly.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod attrs;
mod field_source;
mod from_row;

/// Derive macro for building Rust structs from result rows.
///
/// Each field is read by column name with `Row::get`. `Option<T>` fields
/// accept SQL NULL.
///
/// # Attributes
///
/// - `#[litedao(rename = "column_name")]` - Read a different column for this field
/// - `#[litedao(skip)]` - Don't read this field; it is set to `Default::default()`
///
/// # Example
///
/// ```ignore
/// use litedao::FromRow;
///
/// #[derive(FromRow)]
/// pub struct User {
///     pub id: i64,
///     #[litedao(rename = "user_name")]
///     pub username: String,
///     pub email: Option<String>,
/// }
/// ```
#[proc_macro_derive(FromRow, attributes(litedao))]
pub fn derive_from_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    from_row::derive_from_row_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive macro for writing Rust structs as records.
///
/// Fields become columns in declaration order. A field whose value converts
/// to NULL (e.g. `None`) is left out of the statement.
///
/// # Attributes
///
/// - `#[litedao(rename = "column_name")]` - Write this field to a different column
/// - `#[litedao(skip)]` - Never write this field (e.g. auto-increment ids)
///
/// # Example
///
/// ```ignore
/// use litedao::FieldSource;
///
/// #[derive(FieldSource)]
/// pub struct NewUser {
///     #[litedao(skip)]
///     pub id: i64,
///     pub username: String,
///     pub email: String,
/// }
/// ```
#[proc_macro_derive(FieldSource, attributes(litedao))]
pub fn derive_field_source(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    field_source::derive_field_source_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
