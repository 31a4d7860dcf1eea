//! Ordered field changes and field-to-column translation.

use std::collections::HashMap;

use crate::error::{JoblyError, JoblyResult};
use crate::value::FieldValue;

/// An ordered set of `field -> value` changes.
///
/// Iteration order is insertion order; it decides the placeholder numbering of
/// the generated `SET` clause. Keys are unique: inserting an existing key
/// replaces the value and keeps the key's original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: Vec<(String, FieldValue)>,
}

impl FieldMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field, returning the previous value if any.
    pub fn insert(
        &mut self,
        field: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        let field = field.into();
        let value = value.into();
        if let Some(idx) = self.entries.iter().position(|(k, _)| *k == field) {
            return Some(std::mem::replace(&mut self.entries[idx].1, value));
        }
        self.entries.push((field, value));
        None
    }

    /// Builder-style [`FieldMap::insert`].
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == field)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &FieldValue> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Build from a JSON request body.
    ///
    /// The body must be an object whose values are all scalars. Key order of
    /// the object is kept.
    pub fn from_json(body: serde_json::Value) -> JoblyResult<Self> {
        match body {
            serde_json::Value::Object(object) => Self::from_json_object(object),
            other => Err(JoblyError::bad_request(format!(
                "Expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn from_json_object(object: serde_json::Map<String, serde_json::Value>) -> JoblyResult<Self> {
        let mut map = Self::new();
        for (field, value) in object {
            let value = FieldValue::from_json(value).map_err(|e| match e {
                JoblyError::BadRequest(msg) => {
                    JoblyError::bad_request(format!("Field '{field}': {msg}"))
                }
                other => other,
            })?;
            map.insert(field, value);
        }
        Ok(map)
    }
}

impl<K, V> FromIterator<(K, V)> for FieldMap
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl IntoIterator for FieldMap {
    type Item = (String, FieldValue);
    type IntoIter = std::vec::IntoIter<(String, FieldValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Translation from domain field names to storage column names.
///
/// Not required to be total: a field with no entry is its own column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    columns: HashMap<String, String>,
}

impl ColumnMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style mapping of `field` to `column`.
    pub fn with(mut self, field: impl Into<String>, column: impl Into<String>) -> Self {
        self.columns.insert(field.into(), column.into());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, column: impl Into<String>) {
        self.columns.insert(field.into(), column.into());
    }

    /// Column name for `field`.
    pub fn resolve<'a>(&'a self, field: &'a str) -> &'a str {
        self.columns.get(field).map_or(field, String::as_str)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ColumnMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            columns: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_insertion_order() {
        let map = FieldMap::new()
            .with("title", "Engineer")
            .with("salary", 100_000)
            .with("equity", 0.1);
        assert_eq!(map.keys().collect::<Vec<_>>(), ["title", "salary", "equity"]);
    }

    #[test]
    fn reinsert_replaces_in_place() {
        let mut map = FieldMap::new().with("a", 1).with("b", 2);
        let prev = map.insert("a", 3);
        assert_eq!(prev, Some(FieldValue::Int(1)));
        assert_eq!(map.len(), 2);
        assert_eq!(
            map.iter().collect::<Vec<_>>(),
            [("a", &FieldValue::Int(3)), ("b", &FieldValue::Int(2))]
        );
    }

    #[test]
    fn from_json_preserves_body_order() {
        let body = json!({"numEmployees": 10, "name": "IBM", "logoUrl": null});
        let map = FieldMap::from_json(body).unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), ["numEmployees", "name", "logoUrl"]);
        assert_eq!(map.get("logoUrl"), Some(&FieldValue::Null));
    }

    #[test]
    fn from_json_rejects_non_object() {
        let err = FieldMap::from_json(json!([1, 2])).unwrap_err();
        assert!(err.is_bad_request());
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn from_json_rejects_nested_value() {
        let err = FieldMap::from_json(json!({"name": {"first": "a"}})).unwrap_err();
        assert!(err.is_bad_request());
        assert!(err.to_string().contains("'name'"));
    }

    #[test]
    fn column_map_falls_back_to_field_name() {
        let columns: ColumnMap = [("firstName", "first_name")].into_iter().collect();
        assert_eq!(columns.resolve("firstName"), "first_name");
        assert_eq!(columns.resolve("age"), "age");
    }
}
