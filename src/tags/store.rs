//! Mutable key/value environment that tags read from and write to.

use indexmap::IndexMap;

use super::value::Value;

/// Flat, insertion-ordered mapping from tag name to value.
///
/// A store is built per parse from the caller's seed values and mutated by
/// assignment tags, `push`, `vector` and `object`. Callers that want state to
/// carry over between parses keep the store and pass it back in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    tags: IndexMap<String, Value>,
}

impl Store {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from positional values, keyed `"0"`, `"1"`, ...
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Self {
            tags: values
                .into_iter()
                .enumerate()
                .map(|(index, value)| (index.to_string(), value))
                .collect(),
        }
    }

    /// Seed from named values, inserted verbatim.
    pub fn from_named<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut store = Self::new();
        store.extend_named(entries);
        store
    }

    /// Overlay named values on top of the current contents.
    pub fn extend_named<I, K>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        for (key, value) in entries {
            self.tags.insert(key.into(), value);
        }
    }

    /// Seed from JSON: an array seeds positionally, an object by name.
    ///
    /// Any other JSON value yields an empty store. Top-level `null` entries
    /// are skipped.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Array(items) => Self::from_values(
                items
                    .into_iter()
                    .map(|item| Value::from_json(item).unwrap_or_else(|| Value::from(""))),
            ),
            serde_json::Value::Object(map) => Self::from_named(
                map.into_iter()
                    .filter_map(|(key, value)| Value::from_json(value).map(|v| (key, v))),
            ),
            _ => Self::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.tags.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.tags.get_mut(key)
    }

    /// Insert or replace a value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.tags.insert(key.into(), value.into());
    }

    pub fn has(&self, key: &str) -> bool {
        self.tags.contains_key(key)
    }

    /// Remove a key, keeping the order of the remaining entries.
    pub fn delete(&mut self, key: &str) -> bool {
        self.tags.shift_remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.tags.values()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl From<Vec<Value>> for Store {
    fn from(values: Vec<Value>) -> Self {
        Self::from_values(values)
    }
}

impl<K: Into<String>> From<Vec<(K, Value)>> for Store {
    fn from(entries: Vec<(K, Value)>) -> Self {
        Self::from_named(entries)
    }
}

impl<K: Into<String>, const N: usize> From<[(K, Value); N]> for Store {
    fn from(entries: [(K, Value); N]) -> Self {
        Self::from_named(entries)
    }
}

impl From<serde_json::Value> for Store {
    fn from(json: serde_json::Value) -> Self {
        Self::from_json(json)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Store {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self::from_named(iter)
    }
}
