//! Record and batch serialization into column lists and literal lists

use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::literal::{quote_identifier, Converter, DefaultConverter};
use crate::traits::FieldSource;
use crate::value::Value;

/// Columns and rendered literals for a single record, positionally matched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SerializedRecord {
    /// Quoted column identifiers
    pub columns: Vec<String>,
    /// Rendered literals, one per column
    pub literals: Vec<String>,
}

impl SerializedRecord {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// `(column, literal)` pairs in order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.literals.iter().map(String::as_str))
    }
}

/// Columns of the first record plus one rendered row per record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SerializedBatch {
    /// Quoted column identifiers taken from the first record
    pub columns: Vec<String>,
    /// One row of rendered literals per record, each aligned to `columns`
    pub rows: Vec<Vec<String>>,
}

fn render_field(converter: &dyn Converter, column: &str, value: &Value) -> Result<String> {
    converter
        .convert(value)
        .map(|literal| literal.render())
        .map_err(|e| Error::Serialization {
            column: column.to_string(),
            source: Box::new(e),
        })
}

/// Serialize one record.
///
/// Null fields are left out of both lists. `converter` overrides the
/// [`DefaultConverter`] for every remaining field. A field named twice is an
/// [`Error::DuplicateField`].
pub fn serialize_record<S: FieldSource + ?Sized>(
    source: &S,
    converter: Option<&dyn Converter>,
) -> Result<SerializedRecord> {
    let converter = converter.unwrap_or(&DefaultConverter);
    let mut out = SerializedRecord::default();

    for (name, value) in non_null_fields(source, 0)? {
        out.literals.push(render_field(converter, &name, &value)?);
        out.columns.push(quote_identifier(&name));
    }

    Ok(out)
}

/// Serialize a batch of records for one multi-row insert.
///
/// The column list comes from the first record's non-null fields. Every other
/// record must have exactly that set of non-null fields; values are
/// reordered by name to line up with the first record's columns. A record
/// that is missing a column or carries an extra one is a [`Error::Shape`].
///
/// The converter is applied to every record, the same as for
/// [`serialize_record`].
pub fn serialize_batch<S: FieldSource>(
    records: &[S],
    converter: Option<&dyn Converter>,
) -> Result<SerializedBatch> {
    let converter = converter.unwrap_or(&DefaultConverter);
    let mut records = records.iter();

    let first = match records.next() {
        Some(first) => first,
        None => return Ok(SerializedBatch::default()),
    };

    let head: Vec<(String, Value)> = non_null_fields(first, 0)?;
    let names: Vec<String> = head.iter().map(|(name, _)| name.clone()).collect();

    let mut batch = SerializedBatch {
        columns: names.iter().map(|n| quote_identifier(n)).collect(),
        rows: Vec::new(),
    };
    batch.rows.push(
        head.iter()
            .map(|(name, value)| render_field(converter, name, value))
            .collect::<Result<Vec<_>>>()?,
    );

    for (offset, record) in records.enumerate() {
        let row_index = offset + 1;
        let fields = non_null_fields(record, row_index)?;

        let mut by_name: HashMap<&str, &Value> = fields
            .iter()
            .map(|(name, value)| (name.as_str(), value))
            .collect();

        let shape_error = || Error::Shape {
            row: row_index,
            expected: names.clone(),
            found: fields.iter().map(|(name, _)| name.clone()).collect(),
        };

        let mut row = Vec::with_capacity(names.len());
        for name in &names {
            let value = by_name.remove(name.as_str()).ok_or_else(shape_error)?;
            row.push(render_field(converter, name, value)?);
        }
        if !by_name.is_empty() {
            return Err(shape_error());
        }
        batch.rows.push(row);
    }

    Ok(batch)
}

fn non_null_fields<S: FieldSource + ?Sized>(
    source: &S,
    row: usize,
) -> Result<Vec<(String, Value)>> {
    let fields = source.fields();
    let mut seen = HashSet::with_capacity(fields.len());
    for (name, _) in &fields {
        if !seen.insert(name.as_str()) {
            return Err(Error::DuplicateField {
                row,
                column: name.clone(),
            });
        }
    }

    Ok(fields
        .into_iter()
        .filter(|(_, value)| !value.is_null())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::Literal;
    use chrono::NaiveDate;
    use indexmap::IndexMap;

    fn record(pairs: &[(&str, Value)]) -> IndexMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_record_skips_nulls_and_keeps_order() {
        let data = record(&[
            ("name", Value::from("ann")),
            ("nickname", Value::Null),
            ("active", Value::Bool(true)),
            ("born", Value::Date(NaiveDate::from_ymd_opt(1990, 5, 17).unwrap())),
        ]);

        let out = serialize_record(&data, None).unwrap();
        assert_eq!(out.columns, vec!["`name`", "`active`", "`born`"]);
        assert_eq!(out.literals, vec!["'ann'", "1", "'1990-05-17'"]);
        assert_eq!(out.columns.len(), out.literals.len());
    }

    #[test]
    fn test_record_all_null_is_empty() {
        let data = record(&[("a", Value::Null), ("b", Value::Null)]);
        let out = serialize_record(&data, None).unwrap();
        assert!(out.is_empty());
        assert!(out.literals.is_empty());
    }

    #[test]
    fn test_record_custom_converter() {
        let data = record(&[("note", Value::from("")), ("n", Value::I32(4))]);
        let conv = |v: &Value| match v {
            Value::String(s) if s.is_empty() => Ok(Literal::Null),
            Value::I32(n) => Ok(Literal::Raw((n * 10).to_string())),
            other => DefaultConverter.convert(other),
        };

        let out = serialize_record(&data, Some(&conv)).unwrap();
        assert_eq!(out.literals, vec!["NULL", "40"]);
    }

    #[test]
    fn test_record_serialization_error_names_column() {
        let data = record(&[("ratio", Value::F64(f64::INFINITY))]);
        match serialize_record(&data, None) {
            Err(Error::Serialization { column, source }) => {
                assert_eq!(column, "ratio");
                assert!(matches!(*source, Error::Unconvertible { .. }));
            }
            other => panic!("expected serialization error, got {:?}", other),
        }
    }

    #[test]
    fn test_batch_columns_from_first_row() {
        let rows = vec![
            record(&[("a", Value::I32(1)), ("b", Value::I32(2))]),
            record(&[("a", Value::I32(3)), ("b", Value::I32(4))]),
        ];

        let out = serialize_batch(&rows, None).unwrap();
        assert_eq!(out.columns, vec!["`a`", "`b`"]);
        assert_eq!(
            out.rows,
            vec![vec!["'1'", "'2'"], vec!["'3'", "'4'"]]
        );
    }

    #[test]
    fn test_batch_realigns_by_name() {
        let rows = vec![
            record(&[("a", Value::I32(1)), ("b", Value::I32(2))]),
            record(&[("b", Value::I32(4)), ("a", Value::I32(3))]),
        ];

        let out = serialize_batch(&rows, None).unwrap();
        assert_eq!(out.rows[1], vec!["'3'", "'4'"]);
    }

    #[test]
    fn test_batch_shape_errors() {
        let missing = vec![
            record(&[("a", Value::I32(1)), ("b", Value::I32(2))]),
            record(&[("a", Value::I32(3)), ("b", Value::Null)]),
        ];
        assert!(matches!(
            serialize_batch(&missing, None),
            Err(Error::Shape { row: 1, .. })
        ));

        let extra = vec![
            record(&[("a", Value::I32(1))]),
            record(&[("a", Value::I32(3)), ("c", Value::I32(9))]),
        ];
        match serialize_batch(&extra, None) {
            Err(Error::Shape { row, expected, found }) => {
                assert_eq!(row, 1);
                assert_eq!(expected, vec!["a"]);
                assert_eq!(found, vec!["a", "c"]);
            }
            other => panic!("expected shape error, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_field_names_rejected() {
        let rows = vec![[("a", 3), ("b", 1)], [("a", 3), ("a", 4)]];
        match serialize_batch(&rows, None) {
            Err(Error::DuplicateField { row, column }) => {
                assert_eq!(row, 1);
                assert_eq!(column, "a");
            }
            other => panic!("expected duplicate field error, got {:?}", other),
        }

        let single = [("a", 3), ("a", 4)];
        assert!(matches!(
            serialize_record(&single, None),
            Err(Error::DuplicateField { row: 0, .. })
        ));
    }

    #[test]
    fn test_batch_applies_converter() {
        let rows = vec![
            record(&[("flag", Value::Bool(true))]),
            record(&[("flag", Value::Bool(false))]),
        ];
        let conv = |v: &Value| match v {
            Value::Bool(b) => Ok(Literal::text(if *b { "Y" } else { "N" })),
            other => DefaultConverter.convert(other),
        };

        let out = serialize_batch(&rows, Some(&conv)).unwrap();
        assert_eq!(out.rows, vec![vec!["'Y'"], vec!["'N'"]]);
    }

    #[test]
    fn test_empty_batch() {
        let rows: Vec<IndexMap<String, Value>> = Vec::new();
        let out = serialize_batch(&rows, None).unwrap();
        assert!(out.columns.is_empty());
        assert!(out.rows.is_empty());
    }
}
