//! URL building: base-url joining and deterministic query serialization.
//!
//! The query encoder is deliberately not a general-purpose form encoder. It
//! percent-encodes UTF-8 bytes but leaves `@ : $ , [ ]` readable in values
//! and turns spaces into `+`; parameter *names* additionally escape the
//! brackets so that repeated-list keys arrive as `key%5B%5D=`.

use serde_json::Value;

use crate::config::{ParamsSerializer, RequestConfig};
use crate::error::{Error, Result};
use crate::params::{ParamValue, Params};

/// Characters kept readable in query values on top of the unreserved set.
const VALUE_KEEP: &[char] = &['@', ':', '$', ',', '[', ']'];

/// Characters kept readable in query names. Brackets are escaped so list
/// keys serialize as `key%5B%5D=`.
const NAME_KEEP: &[char] = &['@', ':', '$', ','];

fn is_unreserved(c: char) -> bool {
    // The JS-style unreserved set: alphanumerics plus - _ . ! ~ * ' ( )
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '!' | '~' | '*' | '\'' | '(' | ')')
}

fn percent_encode(component: &str, keep: &[char]) -> String {
    let mut encoded = String::with_capacity(component.len());
    for c in component.chars() {
        if is_unreserved(c) || keep.contains(&c) {
            encoded.push(c);
        } else if c == ' ' {
            encoded.push('+');
        } else {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                encoded.push('%');
                encoded.push_str(&format!("{byte:02X}"));
            }
        }
    }
    encoded
}

/// Percent-encodes a query value, keeping `@ : $ , [ ]` readable and
/// turning spaces into `+`.
#[must_use]
pub fn encode(component: &str) -> String {
    percent_encode(component, VALUE_KEEP)
}

/// Returns `true` for scheme-qualified (`http://…`) and scheme-relative
/// (`//…`) urls, which bypass the configured base url.
#[must_use]
pub fn is_absolute_url(url: &str) -> bool {
    if url.starts_with("//") {
        return true;
    }
    let Some((scheme, rest)) = url.split_once(':') else {
        return false;
    };
    if !rest.starts_with("//") {
        return false;
    }
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Joins a base url and a relative path with exactly one slash between them.
#[must_use]
pub fn combine_url(base: &str, relative: &str) -> String {
    if relative.is_empty() {
        return base.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        relative.trim_start_matches('/')
    )
}

fn render_scalar(value: &ParamValue) -> Option<String> {
    match value {
        ParamValue::Null => None,
        ParamValue::Str(s) => Some(s.clone()),
        ParamValue::Int(i) => Some(i.to_string()),
        ParamValue::Float(f) => Some(f.to_string()),
        ParamValue::Bool(b) => Some(b.to_string()),
        ParamValue::DateTime(dt) => {
            Some(dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
        }
        // Nested structures collapse to their JSON text form.
        ParamValue::Object(map) => serde_json::to_string(&Value::Object(map.clone())).ok(),
        ParamValue::List(_) => serde_json::to_string(&value.to_json_value()).ok(),
    }
}

/// Serializes parameters into `name=value&…` pairs in insertion order.
///
/// Lists fan out into one `key[]=` pair per element; null values are skipped.
#[must_use]
pub fn serialize_params(params: &Params) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(params.len());
    for (name, value) in params.iter() {
        match value {
            ParamValue::Null => {}
            ParamValue::List(items) => {
                let name = format!("{name}[]");
                for item in items {
                    if let Some(text) = render_scalar(item) {
                        parts.push(format!(
                            "{}={}",
                            percent_encode(&name, NAME_KEEP),
                            encode(&text)
                        ));
                    }
                }
            }
            other => {
                if let Some(text) = render_scalar(other) {
                    parts.push(format!(
                        "{}={}",
                        percent_encode(name, NAME_KEEP),
                        encode(&text)
                    ));
                }
            }
        }
    }
    parts.join("&")
}

/// Appends serialized `params` to `url`.
///
/// The query lands after an existing `?` with `&`; a fragment is truncated
/// first so the query can never end up behind it.
#[must_use]
pub fn build_url(url: &str, params: Option<&Params>, serializer: Option<&ParamsSerializer>) -> String {
    let Some(params) = params else {
        return url.to_string();
    };
    let serialized = match serializer {
        Some(custom) => custom.serialize(params),
        None => serialize_params(params),
    };
    if serialized.is_empty() {
        return url.to_string();
    }
    let mut url = match url.find('#') {
        Some(index) => url[..index].to_string(),
        None => url.to_string(),
    };
    url.push(if url.contains('?') { '&' } else { '?' });
    url.push_str(&serialized);
    url
}

/// Resolves the final absolute, query-augmented url for a merged config.
///
/// This is the value the transport sees, and also what
/// [`Client::resolve_url`](crate::client::Client::resolve_url) exposes
/// without dispatching.
pub fn resolve_url(config: &RequestConfig) -> Result<String> {
    let url = config
        .url
        .as_deref()
        .ok_or_else(|| Error::invalid_request("request config has no url"))?;
    let url = match config.base_url.as_deref() {
        Some(base) if !is_absolute_url(url) => combine_url(base, url),
        _ => url.to_string(),
    };
    Ok(build_url(
        &url,
        config.params.as_ref(),
        config.params_serializer.as_ref(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn absolute_url_detection() {
        assert!(is_absolute_url("http://a.com/x"));
        assert!(is_absolute_url("HTTPS://a.com"));
        assert!(is_absolute_url("custom-scheme.v2://a"));
        assert!(is_absolute_url("//cdn.example.com/lib.js"));
        assert!(!is_absolute_url("/relative/path"));
        assert!(!is_absolute_url("path?query=1"));
        assert!(!is_absolute_url("1http://bad-scheme.com"));
    }

    #[test]
    fn combine_trims_exactly_the_joining_slashes() {
        assert_eq!(combine_url("http://a.com/", "/x"), "http://a.com/x");
        assert_eq!(combine_url("http://a.com", "x"), "http://a.com/x");
        assert_eq!(combine_url("http://a.com///", "///x/y"), "http://a.com/x/y");
        assert_eq!(combine_url("http://a.com/base", ""), "http://a.com/base");
    }

    #[test]
    fn arrays_fan_out_with_encoded_bracket_keys() {
        let params = Params::new().with("a", 1).with("b", vec![1i64, 2]);
        assert_eq!(
            build_url("/x", Some(&params), None),
            "/x?a=1&b%5B%5D=1&b%5B%5D=2"
        );
    }

    #[test]
    fn values_keep_the_readable_set() {
        let params = Params::new().with("q", "a@b:c$d,e [f]");
        assert_eq!(
            build_url("/s", Some(&params), None),
            "/s?q=a@b:c$d,e+[f]"
        );
    }

    #[test]
    fn unicode_values_are_utf8_percent_encoded() {
        let params = Params::new().with("name", "café");
        assert_eq!(build_url("/u", Some(&params), None), "/u?name=caf%C3%A9");
    }

    #[test]
    fn datetimes_serialize_as_rfc3339() {
        let dt = chrono::Utc.with_ymd_and_hms(2024, 3, 1, 6, 0, 0).unwrap();
        let params = Params::new().with("since", dt);
        assert_eq!(
            build_url("/t", Some(&params), None),
            "/t?since=2024-03-01T06:00:00.000Z"
        );
    }

    #[test]
    fn nested_objects_are_json_encoded() {
        let mut map = serde_json::Map::new();
        map.insert("a".to_string(), serde_json::json!(1));
        let params = Params::new().with("filter", map);
        assert_eq!(
            build_url("/o", Some(&params), None),
            "/o?filter=%7B%22a%22:1%7D"
        );
    }

    #[test]
    fn null_params_are_skipped() {
        let params = Params::new().with("a", ParamValue::Null).with("b", 2);
        assert_eq!(build_url("/n", Some(&params), None), "/n?b=2");
    }

    #[test]
    fn query_appends_after_existing_separator() {
        let params = Params::new().with("b", 2);
        assert_eq!(build_url("/x?a=1", Some(&params), None), "/x?a=1&b=2");
    }

    #[test]
    fn fragment_never_precedes_the_query() {
        let params = Params::new().with("a", 1);
        assert_eq!(build_url("/x#section", Some(&params), None), "/x?a=1");
    }

    #[test]
    fn empty_serialization_leaves_url_alone() {
        let params = Params::new().with("a", ParamValue::Null);
        assert_eq!(build_url("/x#frag", Some(&params), None), "/x#frag");
    }

    #[test]
    fn custom_serializer_bypasses_builtin_rules() {
        let params = Params::new().with("a", 1);
        let serializer = ParamsSerializer::new(|_: &Params| "custom=yes".to_string());
        assert_eq!(
            build_url("/x", Some(&params), Some(&serializer)),
            "/x?custom=yes"
        );
    }

    #[test]
    fn resolve_joins_base_and_serializes() {
        let config = RequestConfig::default()
            .with_base_url("http://a.com/")
            .with_url("/x")
            .with_params(Params::new().with("a", 1));
        assert_eq!(resolve_url(&config).unwrap(), "http://a.com/x?a=1");
    }

    #[test]
    fn resolve_lets_absolute_urls_bypass_base() {
        let config = RequestConfig::default()
            .with_base_url("http://a.com")
            .with_url("http://b.com/y");
        assert_eq!(resolve_url(&config).unwrap(), "http://b.com/y");
    }

    #[test]
    fn resolve_without_url_is_an_error() {
        let err = resolve_url(&RequestConfig::default()).unwrap_err();
        assert!(err.to_string().contains("no url"));
    }
}
