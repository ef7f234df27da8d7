//! Dynamic values bound to tag names.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use super::numeric::format_number;
use super::store::Store;

/// A native tag function.
///
/// Receives the raw, unparsed payload that followed the tag name and the
/// store of the running parse. Whatever it returns is substituted into the
/// template.
pub type TagFn = Arc<dyn Fn(&str, &mut Store) -> String + Send + Sync>;

/// Ordered string-keyed mapping used for object values.
pub type ObjectMap = IndexMap<String, Value>;

/// A value a tag name can resolve to.
#[derive(Clone)]
pub enum Value {
    String(String),
    Number(f64),
    Bool(bool),
    List(Vec<Value>),
    Object(ObjectMap),
    Fn(TagFn),
}

impl Value {
    /// Wrap a closure as a function value.
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&str, &mut Store) -> String + Send + Sync + 'static,
    {
        Value::Fn(Arc::new(f))
    }

    /// An empty object.
    pub fn object() -> Self {
        Value::Object(ObjectMap::new())
    }

    pub fn as_object(&self) -> Option<&ObjectMap> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_fn(&self) -> bool {
        matches!(self, Value::Fn(_))
    }

    /// Convert a JSON value. `null` has no counterpart and yields `None`.
    ///
    /// Nulls nested in objects are dropped; nulls in arrays become empty
    /// strings so positions are preserved.
    pub fn from_json(json: serde_json::Value) -> Option<Self> {
        match json {
            serde_json::Value::Null => None,
            serde_json::Value::Bool(b) => Some(Value::Bool(b)),
            serde_json::Value::Number(n) => Some(Value::Number(n.as_f64().unwrap_or(f64::NAN))),
            serde_json::Value::String(s) => Some(Value::String(s)),
            serde_json::Value::Array(items) => Some(Value::List(
                items
                    .into_iter()
                    .map(|item| Value::from_json(item).unwrap_or_else(|| Value::from("")))
                    .collect(),
            )),
            serde_json::Value::Object(map) => Some(Value::Object(
                map.into_iter()
                    .filter_map(|(key, value)| Value::from_json(value).map(|v| (key, v)))
                    .collect(),
            )),
        }
    }

    /// JSON form of the value. Functions are not serializable: they are
    /// skipped inside objects and become `null` elsewhere.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
                    serde_json::Value::from(*n as i64)
                } else {
                    serde_json::Number::from_f64(*n)
                        .map(serde_json::Value::Number)
                        .unwrap_or(serde_json::Value::Null)
                }
            }
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(map) => serde_json::Value::Object(
                map.iter()
                    .filter(|(_, v)| !v.is_fn())
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Fn(_) => serde_json::Value::Null,
        }
    }
}

/// Join the text form of each element with `separator`.
pub fn join_values(items: &[Value], separator: &str) -> String {
    items
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

/// Text form substituted into templates.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Bool(b) => write!(f, "{b}"),
            Value::List(items) => f.write_str(&join_values(items, ",")),
            Value::Object(_) => write!(f, "{}", self.to_json()),
            Value::Fn(_) => Ok(()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Object(map) => f.debug_tuple("Object").field(map).finish(),
            Value::Fn(_) => f.write_str("Fn(..)"),
        }
    }
}

/// Functions compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Fn(a), Value::Fn(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<ObjectMap> for Value {
    fn from(map: ObjectMap) -> Self {
        Value::Object(map)
    }
}
