// XML-RPC value model
//
// One enum covering the XML-RPC data types. `dateTime.iso8601` and `base64`
// payloads are kept as their wire text; the appliance never sends them in
// the replies we consume, and passing them through untouched keeps scan
// handles opaque.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// A single XML-RPC value.
///
/// Serializes untagged, so a `Value` renders as the natural JSON shape
/// (numbers, strings, objects, arrays, `null`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// `<int>`, `<i4>` or `<i8>`.
    Int(i64),
    /// `<boolean>`.
    Bool(bool),
    /// `<string>` or untyped text.
    String(String),
    /// `<double>`.
    Double(f64),
    /// `<dateTime.iso8601>`, verbatim.
    DateTime(String),
    /// `<base64>`, still encoded.
    Base64(String),
    /// `<struct>`.
    Struct(BTreeMap<String, Value>),
    /// `<array>`.
    Array(Vec<Value>),
    /// `<nil/>` (extension type).
    Nil,
}

impl Value {
    /// Build a `<struct>` from `(name, value)` pairs.
    pub fn structure<K, I>(members: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::Struct(members.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Struct(members) => Some(members),
            _ => None,
        }
    }

    /// Consume the value, returning its elements if it is an array.
    pub fn into_array(self) -> Result<Vec<Value>, Self> {
        match self {
            Self::Array(items) => Ok(items),
            other => Err(other),
        }
    }

    /// Name of the XML-RPC type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Bool(_) => "boolean",
            Self::String(_) => "string",
            Self::Double(_) => "double",
            Self::DateTime(_) => "dateTime.iso8601",
            Self::Base64(_) => "base64",
            Self::Struct(_) => "struct",
            Self::Array(_) => "array",
            Self::Nil => "nil",
        }
    }
}

/// Textual form of a value. Strings print bare; composites print as JSON.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::String(s) | Self::DateTime(s) | Self::Base64(s) => f.write_str(s),
            Self::Double(d) => write!(f, "{d}"),
            Self::Nil => f.write_str("nil"),
            Self::Struct(_) | Self::Array(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Self::Double(d)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Array(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(members: BTreeMap<String, Value>) -> Self {
        Self::Struct(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prints_strings_bare() {
        assert_eq!(Value::from("DP.1").to_string(), "DP.1");
        assert_eq!(Value::from(42).to_string(), "42");
    }

    #[test]
    fn display_prints_composites_as_json() {
        let v = Value::structure([("id", Value::from(7)), ("name", Value::from("Audit"))]);
        assert_eq!(v.to_string(), r#"{"id":7,"name":"Audit"}"#);
    }

    #[test]
    fn serializes_untagged() {
        let v = Value::Array(vec![Value::from("a"), Value::Nil, Value::Bool(true)]);
        assert_eq!(
            serde_json::to_value(&v).ok(),
            Some(serde_json::json!(["a", null, true]))
        );
    }
}
