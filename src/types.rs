use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A typed preference value
///
/// The backing store only keeps strings; this type carries the type a key is
/// declared with in the [`DefaultTable`](crate::DefaultTable), and the shape of
/// values returned by [`TypedStore::get_object`](crate::TypedStore::get_object).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PrefValue {
    String(String),
    Bool(bool),
    Integer(i32),
    Float(f64),
}

impl PrefValue {
    /// Render the value the way it is written to the backing store
    pub fn to_stored(&self) -> String {
        match self {
            PrefValue::String(s) => s.clone(),
            PrefValue::Bool(b) => b.to_string(),
            PrefValue::Integer(i) => i.to_string(),
            PrefValue::Float(f) => f.to_string(),
        }
    }

    /// Name of the value's type, used in log output
    pub fn type_name(&self) -> &'static str {
        match self {
            PrefValue::String(_) => "string",
            PrefValue::Bool(_) => "bool",
            PrefValue::Integer(_) => "int",
            PrefValue::Float(_) => "double",
        }
    }
}

impl fmt::Display for PrefValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_stored())
    }
}

impl From<&str> for PrefValue {
    fn from(value: &str) -> Self {
        PrefValue::String(value.to_string())
    }
}

impl From<String> for PrefValue {
    fn from(value: String) -> Self {
        PrefValue::String(value)
    }
}

impl From<bool> for PrefValue {
    fn from(value: bool) -> Self {
        PrefValue::Bool(value)
    }
}

impl From<i32> for PrefValue {
    fn from(value: i32) -> Self {
        PrefValue::Integer(value)
    }
}

impl From<f64> for PrefValue {
    fn from(value: f64) -> Self {
        PrefValue::Float(value)
    }
}

/// Convenience accessors for [`PrefValue`]
pub trait PrefValueExt {
    fn as_str(&self) -> Option<&str>;
    fn as_bool(&self) -> Option<bool>;
    fn as_int(&self) -> Option<i32>;
    fn as_f64(&self) -> Option<f64>;
}

impl PrefValueExt for PrefValue {
    fn as_str(&self) -> Option<&str> {
        match self {
            PrefValue::String(s) => Some(s),
            _ => None,
        }
    }

    fn as_bool(&self) -> Option<bool> {
        match self {
            PrefValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn as_int(&self) -> Option<i32> {
        match self {
            PrefValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            PrefValue::Float(f) => Some(*f),
            PrefValue::Integer(i) => Some(f64::from(*i)),
            _ => None,
        }
    }
}

/// Snapshot of every stored preference, keyed by name
pub type PreferenceMap = BTreeMap<String, PrefValue>;

/// Representation for array output format
#[derive(Debug, Clone, Serialize)]
pub struct PreferenceEntry {
    pub key: String,
    pub value: PrefValue,
}
