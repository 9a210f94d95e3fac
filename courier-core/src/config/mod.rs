//! Request configuration.
//!
//! [`RequestConfig`] is the single canonical request description: every field
//! is optional so a per-call config can override exactly the fields it cares
//! about and inherit the rest from the client defaults via
//! [`merge_config`](crate::config::merge_config).

mod merge;

pub use merge::merge_config;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cancel::CancelToken;
use crate::error::Error;
use crate::headers::Headers;
use crate::params::Params;
use crate::transform::BodyTransform;
use crate::transport::ProgressCallback;

/// HTTP method, normalized to lower case by construction: the wire form is
/// whatever [`as_str`](Method::as_str) returns, and parsing accepts any
/// casing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// GET (the default when a config names no method).
    #[default]
    Get,
    /// DELETE
    Delete,
    /// HEAD
    Head,
    /// OPTIONS
    Options,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
}

impl Method {
    /// Lower-case method name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Delete => "delete",
            Method::Head => "head",
            Method::Options => "options",
            Method::Post => "post",
            Method::Put => "put",
            Method::Patch => "patch",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Method::Get),
            "delete" => Ok(Method::Delete),
            "head" => Ok(Method::Head),
            "options" => Ok(Method::Options),
            "post" => Ok(Method::Post),
            "put" => Ok(Method::Put),
            "patch" => Ok(Method::Patch),
            other => Err(Error::invalid_request(format!("unsupported method: {other}"))),
        }
    }
}

/// Hint for how the response body should be interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// Parse textual bodies as JSON (the default).
    #[default]
    Json,
    /// Keep the body as raw text; suppresses the default JSON parse.
    Text,
}

/// Basic-auth credential pair, encoded into an `Authorization` header by the
/// transport adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicAuth {
    /// User name.
    pub username: String,
    /// Password.
    pub password: String,
}

impl BasicAuth {
    /// Creates a credential pair.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Status-acceptance predicate. The default accepts 2xx.
#[derive(Clone)]
pub struct StatusValidator(Arc<dyn Fn(u16) -> bool + Send + Sync>);

impl StatusValidator {
    /// Wraps a predicate over the numeric status code.
    pub fn new(predicate: impl Fn(u16) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(predicate))
    }

    /// Returns `true` if `status` counts as success.
    #[must_use]
    pub fn accepts(&self, status: u16) -> bool {
        (self.0)(status)
    }
}

impl Default for StatusValidator {
    fn default() -> Self {
        Self::new(|status| (200..300).contains(&status))
    }
}

impl fmt::Debug for StatusValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StatusValidator")
    }
}

/// Custom query-string serializer; when set it replaces the built-in rules in
/// [`crate::url::serialize_params`] entirely.
#[derive(Clone)]
pub struct ParamsSerializer(Arc<dyn Fn(&Params) -> String + Send + Sync>);

impl ParamsSerializer {
    /// Wraps a serializer function.
    pub fn new(f: impl Fn(&Params) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Serializes `params` into the text placed after `?`.
    #[must_use]
    pub fn serialize(&self, params: &Params) -> String {
        (self.0)(params)
    }
}

impl fmt::Debug for ParamsSerializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ParamsSerializer")
    }
}

/// User-supplied request description.
///
/// Every field is optional; absent fields inherit from the client defaults
/// during the merge. Two invariants hold by the time the transport runs:
/// the method is lower-case (inherent to [`Method`]) and `url` has been
/// resolved to an absolute, query-augmented string.
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Request url, relative to `base_url` unless absolute.
    pub url: Option<String>,
    /// HTTP method; defaults to GET at dispatch.
    pub method: Option<Method>,
    /// Prefix joined onto relative urls.
    pub base_url: Option<String>,
    /// Outgoing headers.
    pub headers: Option<Headers>,
    /// Query parameters serialized into the url.
    pub params: Option<Params>,
    /// Request body; opaque until the request transforms run.
    pub data: Option<Value>,
    /// Time budget for the exchange; the transport rejects with a timeout
    /// error once it elapses.
    pub timeout: Option<Duration>,
    /// Expected body interpretation.
    pub response_type: Option<ResponseType>,
    /// Credentialed cross-origin mode.
    pub with_credentials: Option<bool>,
    /// Cookie read for CSRF protection.
    pub xsrf_cookie_name: Option<String>,
    /// Header the CSRF cookie value is injected into.
    pub xsrf_header_name: Option<String>,
    /// Basic-auth credentials.
    pub auth: Option<BasicAuth>,
    /// Request transform pipeline override.
    pub transform_request: Option<Vec<BodyTransform>>,
    /// Response transform pipeline override.
    pub transform_response: Option<Vec<BodyTransform>>,
    /// Status-acceptance predicate override.
    pub validate_status: Option<StatusValidator>,
    /// Custom query serializer.
    pub params_serializer: Option<ParamsSerializer>,
    /// Cooperative cancellation handle.
    pub cancel_token: Option<CancelToken>,
    /// Upload progress callback.
    pub on_upload_progress: Option<ProgressCallback>,
    /// Download progress callback.
    pub on_download_progress: Option<ProgressCallback>,
}

impl RequestConfig {
    /// Creates an empty config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the url.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the method.
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the base url.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets a single header, creating the map if needed.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.get_or_insert_with(Headers::new).insert(name, value);
        self
    }

    /// Sets the query parameters.
    #[must_use]
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = Some(params);
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the response type hint.
    #[must_use]
    pub fn with_response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = Some(response_type);
        self
    }

    /// Sets the cancellation token.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel_token = Some(token);
        self
    }

    /// Sets the status-acceptance predicate.
    #[must_use]
    pub fn with_validate_status(mut self, validator: StatusValidator) -> Self {
        self.validate_status = Some(validator);
        self
    }

    /// Sets basic-auth credentials.
    #[must_use]
    pub fn with_auth(mut self, auth: BasicAuth) -> Self {
        self.auth = Some(auth);
        self
    }
}
