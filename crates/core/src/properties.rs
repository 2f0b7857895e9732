//! Property bags delivered by the container
//!
//! Every lifecycle callback carries a string-keyed bag of values. Components
//! read well-known keys out of it; unknown keys are carried along untouched.

use std::collections::BTreeMap;
use std::fmt;

/// Property key holding the configured identifier
pub const ID: &str = "id";
/// Property key holding the container's display identifier
pub const DISPLAY_ID: &str = "config.displayId";

/// A string-keyed property bag
///
/// Ordered so that snapshots and log output are deterministic.
pub type Properties = BTreeMap<String, PropertyValue>;

/// A single property value
#[derive(Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// UTF-8 string
    String(String),
    /// Raw bytes (used for protected values)
    Bytes(Vec<u8>),
    /// Boolean flag
    Bool(bool),
    /// Signed integer
    Long(i64),
    /// Ordered list of strings
    StringList(Vec<String>),
}

impl PropertyValue {
    /// Borrow the value as a string, if it is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the value as bytes
    ///
    /// Strings are exposed as their UTF-8 bytes.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            PropertyValue::Bytes(b) => Some(b),
            PropertyValue::String(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    /// Read the value as a list of strings
    ///
    /// A single string is treated as a one-element list.
    pub fn to_string_list(&self) -> Option<Vec<String>> {
        match self {
            PropertyValue::StringList(items) => Some(items.clone()),
            PropertyValue::String(s) => Some(vec![s.clone()]),
            _ => None,
        }
    }
}

// Bytes may hold credentials, so they never reach log output.
impl fmt::Debug for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::String(s) => write!(f, "{:?}", s),
            PropertyValue::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            PropertyValue::Bool(v) => write!(f, "{}", v),
            PropertyValue::Long(v) => write!(f, "{}", v),
            PropertyValue::StringList(items) => f.debug_list().entries(items).finish(),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<Vec<u8>> for PropertyValue {
    fn from(b: Vec<u8>) -> Self {
        PropertyValue::Bytes(b)
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Bool(v)
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Long(v)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(items: Vec<String>) -> Self {
        PropertyValue::StringList(items)
    }
}

/// Look up a string property
pub fn get_str<'a>(properties: &'a Properties, key: &str) -> Option<&'a str> {
    properties.get(key).and_then(PropertyValue::as_str)
}

/// Build a property bag from key/value pairs
///
/// ```
/// use bindery_core::properties::{props, get_str};
///
/// let p = props([("id", "dbUser"), ("user", "scott")]);
/// assert_eq!(get_str(&p, "user"), Some("scott"));
/// ```
pub fn props<K, V, I>(pairs: I) -> Properties
where
    K: Into<String>,
    V: Into<PropertyValue>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
