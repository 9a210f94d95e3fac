//! Config merge semantics.
//!
//! Instance defaults and a per-call override combine field by field with an
//! explicit strategy per field, not one generic deep merge:
//!
//! | strategy        | fields |
//! |-----------------|--------|
//! | deep-merge      | `headers` (key-by-key union, override wins per key) |
//! | override-wins   | everything else — the override value is taken when present, otherwise the default's; values are never combined |
//!
//! A field absent from both sides stays absent. The merge is stateless and
//! referentially transparent: neither input is mutated and the same inputs
//! always produce the same result, which makes it idempotent
//! (`merge(d, merge(d, o)) == merge(d, o)`).

use super::RequestConfig;

/// Merges client defaults with a per-call override into one effective config.
#[must_use]
pub fn merge_config(defaults: &RequestConfig, overrides: RequestConfig) -> RequestConfig {
    RequestConfig {
        url: overrides.url.or_else(|| defaults.url.clone()),
        method: overrides.method.or(defaults.method),
        base_url: overrides.base_url.or_else(|| defaults.base_url.clone()),
        headers: match (defaults.headers.as_ref(), overrides.headers) {
            (Some(d), Some(o)) => Some(d.merge(&o)),
            (Some(d), None) => Some(d.clone()),
            (None, o) => o,
        },
        params: overrides.params.or_else(|| defaults.params.clone()),
        data: overrides.data.or_else(|| defaults.data.clone()),
        timeout: overrides.timeout.or(defaults.timeout),
        response_type: overrides.response_type.or(defaults.response_type),
        with_credentials: overrides.with_credentials.or(defaults.with_credentials),
        xsrf_cookie_name: overrides
            .xsrf_cookie_name
            .or_else(|| defaults.xsrf_cookie_name.clone()),
        xsrf_header_name: overrides
            .xsrf_header_name
            .or_else(|| defaults.xsrf_header_name.clone()),
        auth: overrides.auth.or_else(|| defaults.auth.clone()),
        transform_request: overrides
            .transform_request
            .or_else(|| defaults.transform_request.clone()),
        transform_response: overrides
            .transform_response
            .or_else(|| defaults.transform_response.clone()),
        validate_status: overrides
            .validate_status
            .or_else(|| defaults.validate_status.clone()),
        params_serializer: overrides
            .params_serializer
            .or_else(|| defaults.params_serializer.clone()),
        cancel_token: overrides
            .cancel_token
            .or_else(|| defaults.cancel_token.clone()),
        on_upload_progress: overrides
            .on_upload_progress
            .or_else(|| defaults.on_upload_progress.clone()),
        on_download_progress: overrides
            .on_download_progress
            .or_else(|| defaults.on_download_progress.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Method;
    use crate::headers::Headers;
    use crate::params::Params;
    use proptest::prelude::*;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::time::Duration;

    #[test]
    fn override_wins_when_both_present() {
        let defaults = RequestConfig::new()
            .with_url("/default")
            .with_method(Method::Get)
            .with_data(json!({"from": "defaults"}))
            .with_timeout(Duration::from_secs(30));
        let overrides = RequestConfig::new()
            .with_url("/override")
            .with_method(Method::Post)
            .with_data(json!({"from": "override"}));

        let merged = merge_config(&defaults, overrides);
        assert_eq!(merged.url.as_deref(), Some("/override"));
        assert_eq!(merged.method, Some(Method::Post));
        assert_eq!(merged.data, Some(json!({"from": "override"})));
        // absent in override: inherited
        assert_eq!(merged.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn absent_everywhere_stays_absent() {
        let merged = merge_config(&RequestConfig::new(), RequestConfig::new());
        assert!(merged.url.is_none());
        assert!(merged.params.is_none());
        assert!(merged.headers.is_none());
    }

    #[test]
    fn headers_deep_merge_key_by_key() {
        let defaults = RequestConfig::new()
            .with_header("Accept", "*/*")
            .with_header("X-Env", "prod");
        let overrides = RequestConfig::new().with_header("accept", "application/json");

        let merged = merge_config(&defaults, overrides);
        let headers = merged.headers.expect("headers merged");
        assert_eq!(headers.get("Accept"), Some("application/json"));
        assert_eq!(headers.get("X-Env"), Some("prod"));
    }

    #[test]
    fn params_replace_outright_never_combine() {
        let defaults = RequestConfig::new().with_params(Params::new().with("a", 1));
        let overrides = RequestConfig::new().with_params(Params::new().with("b", 2));
        let merged = merge_config(&defaults, overrides);
        let params = merged.params.expect("params present");
        assert_eq!(params.len(), 1);
        assert_eq!(params.iter().next().map(|(name, _)| name), Some("b"));
    }

    #[test]
    fn inputs_are_not_mutated() {
        let defaults = RequestConfig::new().with_header("A", "1");
        let overrides = RequestConfig::new().with_header("A", "2");
        let _ = merge_config(&defaults, overrides.clone());
        assert_eq!(defaults.headers.as_ref().unwrap().get("A"), Some("1"));
        assert_eq!(overrides.headers.as_ref().unwrap().get("A"), Some("2"));
    }

    fn header_map(key_range: &'static str) -> impl Strategy<Value = BTreeMap<String, String>> {
        proptest::collection::btree_map(key_range, "[a-z0-9]{0,6}", 0..4)
    }

    fn headers_from(map: &BTreeMap<String, String>) -> Headers {
        map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    fn normalized(headers: Option<&Headers>) -> BTreeMap<String, String> {
        headers
            .map(|h| {
                h.iter()
                    .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }

    proptest! {
        // merge(d, merge(d, o)) == merge(d, o) on override-wins fields and headers
        #[test]
        fn merge_is_idempotent(
            d_url in proptest::option::of("[a-z/]{1,12}"),
            o_url in proptest::option::of("[a-z/]{1,12}"),
            d_timeout in proptest::option::of(1u64..10_000),
            o_timeout in proptest::option::of(1u64..10_000),
            d_headers in header_map("[a-m]{1,6}"),
            o_headers in header_map("[a-z]{1,6}"),
        ) {
            let defaults = RequestConfig {
                url: d_url,
                timeout: d_timeout.map(Duration::from_millis),
                headers: Some(headers_from(&d_headers)),
                ..RequestConfig::default()
            };
            let overrides = RequestConfig {
                url: o_url,
                timeout: o_timeout.map(Duration::from_millis),
                headers: Some(headers_from(&o_headers)),
                ..RequestConfig::default()
            };

            let once = merge_config(&defaults, overrides);
            let twice = merge_config(&defaults, once.clone());

            prop_assert_eq!(&once.url, &twice.url);
            prop_assert_eq!(once.timeout, twice.timeout);
            prop_assert_eq!(normalized(once.headers.as_ref()), normalized(twice.headers.as_ref()));
        }

        // disjoint header sets produce the union regardless of merge order
        #[test]
        fn disjoint_headers_commute(
            left in header_map("[a-m]{1,6}"),
            right in header_map("[n-z]{1,6}"),
        ) {
            let a = RequestConfig { headers: Some(headers_from(&left)), ..RequestConfig::default() };
            let b = RequestConfig { headers: Some(headers_from(&right)), ..RequestConfig::default() };

            let ab = merge_config(&a, b.clone());
            let ba = merge_config(&b, a.clone());

            prop_assert_eq!(normalized(ab.headers.as_ref()), normalized(ba.headers.as_ref()));
        }
    }
}
