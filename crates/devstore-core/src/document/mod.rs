// ── Schemaless document representation ──
//
// An insertion-ordered, string-keyed map of untyped values: the shape the
// document store persists. Mappers write into it with `append` and read
// back through the typed getters, which treat a missing key and an
// explicit `Null` identically.

mod json;
mod value;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use uuid::Uuid;

use crate::error::DecodeError;

pub use value::{Value, ValueKind};

/// Ordered string-keyed map of [`Value`]s.
///
/// Equality compares keys and values without regard to key order; list
/// values compare element by element, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    fields: IndexMap<String, Value>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value` and return `self` for chaining.
    ///
    /// Re-appending an existing key overwrites it in place.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Insert a value, returning the previous one under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Remove a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.shift_remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    // ── Typed getters ────────────────────────────────────────────────

    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, DecodeError> {
        self.typed(key, ValueKind::Bool, Value::as_bool)
    }

    pub fn get_str(&self, key: &str) -> Result<Option<&str>, DecodeError> {
        self.typed(key, ValueKind::String, Value::as_str)
    }

    pub fn get_uuid(&self, key: &str) -> Result<Option<Uuid>, DecodeError> {
        self.typed(key, ValueKind::Uuid, Value::as_uuid)
    }

    pub fn get_datetime(&self, key: &str) -> Result<Option<DateTime<Utc>>, DecodeError> {
        self.typed(key, ValueKind::DateTime, Value::as_datetime)
    }

    pub fn get_array(&self, key: &str) -> Result<Option<&[Value]>, DecodeError> {
        self.typed(key, ValueKind::Array, Value::as_array)
    }

    pub fn get_document(&self, key: &str) -> Result<Option<&Document>, DecodeError> {
        self.typed(key, ValueKind::Document, Value::as_document)
    }

    fn typed<'a, T>(
        &'a self,
        key: &str,
        expected: ValueKind,
        extract: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Result<Option<T>, DecodeError> {
        match self.fields.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => extract(value)
                .map(Some)
                .ok_or_else(|| DecodeError::unexpected(key, expected, value.kind())),
        }
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Document {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.fields
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn append_preserves_insertion_order() {
        let mut doc = Document::new();
        doc.append("id", 1).append("hw", "HW-1").append("cm", "x");
        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["id", "hw", "cm"]);
    }

    #[test]
    fn append_overwrites_in_place() {
        let mut doc = Document::new();
        doc.append("a", 1).append("b", 2).append("a", 3);
        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(doc.get("a"), Some(&Value::Int64(3)));
    }

    #[test]
    fn remove_keeps_remaining_order() {
        let mut doc: Document = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        assert_eq!(doc.remove("a"), Some(Value::Int64(1)));
        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn typed_getter_treats_null_as_absent() {
        let mut doc = Document::new();
        doc.append("pd", Value::Null);
        assert_eq!(doc.get_uuid("pd"), Ok(None));
        assert_eq!(doc.get_uuid("missing"), Ok(None));
    }

    #[test]
    fn typed_getter_rejects_wrong_kind() {
        let mut doc = Document::new();
        doc.append("em", "not-a-list");
        let err = doc.get_array("em").unwrap_err();
        assert_eq!(
            err,
            DecodeError::unexpected("em", ValueKind::Array, ValueKind::String)
        );
    }

    #[test]
    fn typed_getter_returns_value() {
        let id = Uuid::new_v4();
        let mut doc = Document::new();
        doc.append("id", id).append("hw", "HW-9");
        assert_eq!(doc.get_uuid("id"), Ok(Some(id)));
        assert_eq!(doc.get_str("hw"), Ok(Some("HW-9")));
    }

    #[test]
    fn equality_ignores_key_order_but_not_list_order() {
        let a: Document = [("x", 1), ("y", 2)].into_iter().collect();
        let b: Document = [("y", 2), ("x", 1)].into_iter().collect();
        assert_eq!(a, b);

        let mut l1 = Document::new();
        l1.append("em", vec![Value::from(1), Value::from(2)]);
        let mut l2 = Document::new();
        l2.append("em", vec![Value::from(2), Value::from(1)]);
        assert_ne!(l1, l2);
    }
}
