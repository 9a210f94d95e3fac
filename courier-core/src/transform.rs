//! Body transform pipeline.
//!
//! Transforms are pure `(body, headers) -> body` functions applied strictly
//! in list order, each consuming the previous output. They reshape request
//! bodies before the transport sees them and response bodies after it,
//! independently of interceptors.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::headers::Headers;

type TransformFn = dyn Fn(Value, &Headers) -> Result<Value> + Send + Sync;

/// A single transform step. Cheap to clone.
#[derive(Clone)]
pub struct BodyTransform(Arc<TransformFn>);

impl BodyTransform {
    /// Wraps a pure transform function.
    pub fn new(f: impl Fn(Value, &Headers) -> Result<Value> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Applies this transform to `value`.
    pub fn apply(&self, value: Value, headers: &Headers) -> Result<Value> {
        (self.0)(value, headers)
    }
}

impl fmt::Debug for BodyTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BodyTransform")
    }
}

/// Runs `transforms` over `value` in order, threading each output into the
/// next step.
pub fn apply_transforms(
    mut value: Value,
    headers: &Headers,
    transforms: &[BodyTransform],
) -> Result<Value> {
    for transform in transforms {
        value = transform.apply(value, headers)?;
    }
    Ok(value)
}

/// The default outgoing transform: a plain key-value object is serialized to
/// its JSON text form; arrays, strings and every other pre-serialized body
/// pass through unchanged.
#[must_use]
pub fn default_request_transform() -> BodyTransform {
    BodyTransform::new(|value, _headers| match value {
        Value::Object(_) => {
            let text = serde_json::to_string(&value)
                .map_err(|e| Error::invalid_request(format!("request body serialization failed: {e}")))?;
            Ok(Value::String(text))
        }
        other => Ok(other),
    })
}

/// The default incoming transform: textual bodies are parsed as JSON when
/// possible. Parse failures are swallowed and the raw text kept — the
/// pipeline cannot tell "intentionally text" apart from "malformed JSON" and
/// stays permissive.
#[must_use]
pub fn default_response_transform() -> BodyTransform {
    BodyTransform::new(|value, _headers| {
        if let Value::String(text) = &value
            && let Ok(parsed) = serde_json::from_str::<Value>(text)
        {
            return Ok(parsed);
        }
        Ok(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_bodies_serialize_to_json_text() {
        let out = default_request_transform()
            .apply(json!({"a": 1}), &Headers::new())
            .unwrap();
        assert_eq!(out, Value::String("{\"a\":1}".to_string()));
    }

    #[test]
    fn preserialized_bodies_pass_through() {
        let transform = default_request_transform();
        let headers = Headers::new();
        assert_eq!(
            transform.apply(json!("raw text"), &headers).unwrap(),
            json!("raw text")
        );
        assert_eq!(transform.apply(json!([1, 2]), &headers).unwrap(), json!([1, 2]));
        assert_eq!(transform.apply(Value::Null, &headers).unwrap(), Value::Null);
    }

    #[test]
    fn textual_responses_parse_as_json() {
        let out = default_response_transform()
            .apply(json!("{\"ok\":true}"), &Headers::new())
            .unwrap();
        assert_eq!(out, json!({"ok": true}));
    }

    #[test]
    fn parse_failures_keep_the_raw_text() {
        let out = default_response_transform()
            .apply(json!("not json at all"), &Headers::new())
            .unwrap();
        assert_eq!(out, json!("not json at all"));
    }

    #[test]
    fn transforms_apply_in_list_order() {
        let append = |suffix: &'static str| {
            BodyTransform::new(move |value, _| match value {
                Value::String(s) => Ok(Value::String(format!("{s}{suffix}"))),
                other => Ok(other),
            })
        };
        let out = apply_transforms(
            json!("x"),
            &Headers::new(),
            &[append("-1"), append("-2")],
        )
        .unwrap();
        assert_eq!(out, json!("x-1-2"));
    }
}
