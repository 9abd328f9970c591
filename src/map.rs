//! Ordered field storage for composite values.
//!
//! [`Record`] wraps an [`IndexMap`] so fields keep the order in which they were inserted.
//! Records produced by the deserializers start from a type's default instance, so their
//! order is the order in which the type serializes its fields.
//!
//! ## Examples
//!
//! ```rust
//! use schema_json::{Record, Value};
//!
//! let mut record = Record::new();
//! record.insert("model".to_string(), Value::from("BMW"));
//! record.insert("maxSpeed".to_string(), Value::from(160));
//!
//! let keys: Vec<_> = record.keys().cloned().collect();
//! assert_eq!(keys, vec!["model", "maxSpeed"]);
//! ```

use crate::Value;
use indexmap::IndexMap;

/// An insertion-ordered map of field names to values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record(IndexMap<String, Value>);

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Record(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Record(IndexMap::with_capacity(capacity))
    }

    /// Inserts a field value, returning the previous one.
    ///
    /// An existing key keeps its position.
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.0.values()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Record(IndexMap::from_iter(iter))
    }
}
