//! SQL literals and the converters that produce them

use std::fmt;

use crate::error::{Error, Result};
use crate::value::Value;

/// A value ready to be spliced into SQL text.
///
/// Converters return this instead of a bare string, so a converter can ask
/// for `NULL` explicitly without an in-band marker value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// Text rendered between single quotes. Must already be escaped.
    Text(String),
    /// Text rendered verbatim, without quotes (e.g. `1` for `true`).
    Raw(String),
    /// The SQL `NULL` keyword.
    Null,
}

impl Literal {
    /// Quoted text literal from a string that still needs escaping.
    pub fn text(s: impl AsRef<str>) -> Self {
        Literal::Text(escape_quotes(s.as_ref()))
    }

    /// Render as SQL text.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Text(s) => write!(f, "'{}'", s),
            Literal::Raw(s) => f.write_str(s),
            Literal::Null => f.write_str("NULL"),
        }
    }
}

/// Prefix every single quote with a backslash.
///
/// This is the only escaping applied to values; it is not an injection
/// defence.
pub fn escape_quotes(s: &str) -> String {
    s.replace('\'', "\\'")
}

/// Quote a column name as a MySQL identifier.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Strategy turning one non-null field value into a [`Literal`].
///
/// Passed to [`Session::with_converter`](crate::Session::with_converter) to
/// override how values are rendered, e.g. to format datetimes differently.
/// Any `Fn(&Value) -> Result<Literal>` closure is a converter; delegate to
/// [`DefaultConverter`] for the values you don't handle.
///
/// ```ignore
/// use litedao::{Converter, DefaultConverter, Literal, Value};
///
/// let converter = |value: &Value| match value {
///     Value::DateTime(dt) => Ok(Literal::text(dt.format("%Y-%m-%d %H:%M:%S").to_string())),
///     Value::String(s) if s.is_empty() => Ok(Literal::Null),
///     other => DefaultConverter.convert(other),
/// };
/// ```
pub trait Converter: Send + Sync {
    /// Convert a value to a literal.
    fn convert(&self, value: &Value) -> Result<Literal>;
}

impl<F> Converter for F
where
    F: Fn(&Value) -> Result<Literal> + Send + Sync,
{
    fn convert(&self, value: &Value) -> Result<Literal> {
        self(value)
    }
}

/// The built-in value → literal rules.
///
/// - booleans become unquoted `1` / `0`
/// - dates, datetimes and times become quoted ISO-8601 text
/// - strings, numbers, decimals and JSON become quoted text with `'` escaped
/// - binary data must be valid UTF-8; non-finite floats are rejected
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConverter;

impl Converter for DefaultConverter {
    fn convert(&self, value: &Value) -> Result<Literal> {
        let literal = match value {
            Value::Null => Literal::Null,
            Value::Bool(b) => Literal::Raw(if *b { "1" } else { "0" }.to_string()),
            Value::I8(v) => Literal::Text(v.to_string()),
            Value::I16(v) => Literal::Text(v.to_string()),
            Value::I32(v) => Literal::Text(v.to_string()),
            Value::I64(v) => Literal::Text(v.to_string()),
            Value::U8(v) => Literal::Text(v.to_string()),
            Value::U16(v) => Literal::Text(v.to_string()),
            Value::U32(v) => Literal::Text(v.to_string()),
            Value::U64(v) => Literal::Text(v.to_string()),
            Value::F32(v) => float_literal(value, f64::from(*v), v.to_string())?,
            Value::F64(v) => float_literal(value, *v, v.to_string())?,
            Value::Decimal(v) => Literal::Text(v.to_string()),
            Value::String(s) => Literal::text(s),
            Value::Bytes(b) => match std::str::from_utf8(b) {
                Ok(s) => Literal::text(s),
                Err(e) => {
                    return Err(Error::Unconvertible {
                        type_name: value.type_name(),
                        reason: format!("binary data is not valid UTF-8 text ({})", e),
                    })
                }
            },
            Value::Date(d) => Literal::Text(d.format("%Y-%m-%d").to_string()),
            Value::DateTime(dt) => Literal::Text(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
            Value::Time(t) => Literal::Text(t.format("%H:%M:%S%.f").to_string()),
            Value::Json(j) => Literal::text(j.to_string()),
        };
        Ok(literal)
    }
}

fn float_literal(value: &Value, v: f64, shown: String) -> Result<Literal> {
    if v.is_finite() {
        Ok(Literal::Text(shown))
    } else {
        Err(Error::Unconvertible {
            type_name: value.type_name(),
            reason: format!("{} has no SQL representation", shown),
        })
    }
}
