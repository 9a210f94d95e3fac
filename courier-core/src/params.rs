//! Query parameter values.
//!
//! [`Params`] is an insertion-ordered list of name/value pairs; serialization
//! into a query string lives in [`crate::url`]. Values are typed so that
//! datetimes and nested structures get the serialization rules they need
//! (RFC 3339 text for datetimes, JSON text for objects) instead of a single
//! stringly-typed escape hatch.

use chrono::{DateTime, Utc};
use serde_json::Value;

/// A single query parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Absent value; skipped entirely during serialization.
    Null,
    /// Text value.
    Str(String),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Boolean value.
    Bool(bool),
    /// Datetime, serialized as RFC 3339 with millisecond precision.
    DateTime(DateTime<Utc>),
    /// List value; produces one `key[]=` pair per element.
    List(Vec<ParamValue>),
    /// Nested object, JSON-encoded before percent-encoding.
    Object(serde_json::Map<String, Value>),
}

impl ParamValue {
    /// Lowers the value into a `serde_json::Value`, rendering datetimes as
    /// their RFC 3339 text form. Used when a nested value has to be
    /// JSON-encoded into a single query pair.
    #[must_use]
    pub fn to_json_value(&self) -> Value {
        match self {
            ParamValue::Null => Value::Null,
            ParamValue::Str(s) => Value::String(s.clone()),
            ParamValue::Int(i) => Value::from(*i),
            ParamValue::Float(f) => serde_json::Number::from_f64(*f)
                .map_or(Value::Null, Value::Number),
            ParamValue::Bool(b) => Value::Bool(*b),
            ParamValue::DateTime(dt) => Value::String(
                dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            ),
            ParamValue::List(items) => {
                Value::Array(items.iter().map(ParamValue::to_json_value).collect())
            }
            ParamValue::Object(map) => Value::Object(map.clone()),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(i64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<DateTime<Utc>> for ParamValue {
    fn from(value: DateTime<Utc>) -> Self {
        ParamValue::DateTime(value)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        ParamValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Map<String, Value>> for ParamValue {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        ParamValue::Object(map)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ParamValue::Null, Into::into)
    }
}

/// Insertion-ordered query parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    /// Creates an empty parameter list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter. Names may repeat; serialization emits one pair
    /// per entry in insertion order.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no parameters were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, V: Into<ParamValue>> FromIterator<(N, V)> for Params {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut params = Params::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn preserves_insertion_order() {
        let params = Params::new().with("z", 1).with("a", 2).with("m", 3);
        let names: Vec<&str> = params.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }

    #[test]
    fn datetime_lowers_to_rfc3339_millis() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).unwrap();
        let value = ParamValue::from(dt).to_json_value();
        assert_eq!(value, Value::String("2024-03-01T12:30:45.000Z".to_string()));
    }

    #[test]
    fn option_none_becomes_null() {
        assert_eq!(ParamValue::from(None::<i64>), ParamValue::Null);
        assert_eq!(ParamValue::from(Some(7)), ParamValue::Int(7));
    }
}
