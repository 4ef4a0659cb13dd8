//! FieldSource trait: anything that can be written as one record

use std::collections::BTreeMap;
use std::hash::BuildHasher;

use indexmap::IndexMap;

use crate::row::Row;
use crate::traits::ToValue;
use crate::value::Value;

/// A source of ordered field/value pairs used as an insert or update payload.
///
/// Field order is significant: it becomes the column order of the generated
/// statement. Fields whose value is [`Value::Null`] are skipped by the
/// serializer.
///
/// Implemented for ordered key-value containers and, through
/// `#[derive(FieldSource)]`, for structs.
///
/// ```ignore
/// use litedao::FieldSource;
///
/// #[derive(FieldSource)]
/// pub struct NewUser {
///     pub username: String,
///     #[litedao(rename = "mail")]
///     pub email: String,
///     pub nickname: Option<String>, // skipped when None
/// }
/// ```
pub trait FieldSource {
    /// Yield this record's fields in column order.
    fn fields(&self) -> Vec<(String, Value)>;
}

impl<T: FieldSource + ?Sized> FieldSource for &T {
    fn fields(&self) -> Vec<(String, Value)> {
        (**self).fields()
    }
}

impl<K, V, S> FieldSource for IndexMap<K, V, S>
where
    K: AsRef<str>,
    V: ToValue,
    S: BuildHasher,
{
    fn fields(&self) -> Vec<(String, Value)> {
        self.iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.to_value()))
            .collect()
    }
}

impl<K: AsRef<str>, V: ToValue> FieldSource for BTreeMap<K, V> {
    fn fields(&self) -> Vec<(String, Value)> {
        self.iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.to_value()))
            .collect()
    }
}

impl<K: AsRef<str>, V: ToValue> FieldSource for [(K, V)] {
    fn fields(&self) -> Vec<(String, Value)> {
        self.iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.to_value()))
            .collect()
    }
}

impl<K: AsRef<str>, V: ToValue, const N: usize> FieldSource for [(K, V); N] {
    fn fields(&self) -> Vec<(String, Value)> {
        self.as_slice().fields()
    }
}

impl<K: AsRef<str>, V: ToValue> FieldSource for Vec<(K, V)> {
    fn fields(&self) -> Vec<(String, Value)> {
        self.as_slice().fields()
    }
}

impl FieldSource for serde_json::Map<String, serde_json::Value> {
    fn fields(&self) -> Vec<(String, Value)> {
        self.iter()
            .map(|(k, v)| (k.clone(), Value::from_json(v.clone())))
            .collect()
    }
}

impl FieldSource for Row {
    fn fields(&self) -> Vec<(String, Value)> {
        self.iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}
