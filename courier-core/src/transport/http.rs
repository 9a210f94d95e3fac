//! Reqwest-backed transport adapter.
//!
//! Owns the connection pool and everything wire-level the core stays out of:
//! per-request timeout enforcement, abort-on-cancellation, streamed body
//! download with progress events, CSRF header injection via the injected
//! cookie store, and basic-auth encoding.

use std::time::Duration;

use base64::{Engine as _, engine::general_purpose};
use futures_util::StreamExt;
use serde_json::Value;
use tracing::{debug, error, instrument, warn};

use async_trait::async_trait;

use crate::config::{Method, RequestConfig};
use crate::error::{Error, Result};
use crate::headers::Headers;
use crate::platform::{PlatformContext, same_origin};

use super::{ProgressCallback, ProgressEvent, RawRequest, RawResponse, Transport, TransportError};

/// Connection-pool and default-behavior knobs for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Time budget applied when a request config names no timeout.
    pub default_timeout: Duration,
    /// TCP connection timeout.
    pub connect_timeout: Duration,
    /// Maximum idle keep-alive connections per host.
    pub pool_max_idle_per_host: usize,
    /// Idle connections older than this are closed.
    pub pool_idle_timeout: Duration,
    /// Default User-Agent header value.
    pub user_agent: String,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            default_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_max_idle_per_host: 10,
            pool_idle_timeout: Duration::from_secs(90),
            user_agent: "courier/0.1".to_string(),
        }
    }
}

/// Production [`Transport`] over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: HttpTransportConfig,
    platform: PlatformContext,
}

impl HttpTransport {
    /// Builds the underlying client with the given pool configuration.
    pub fn new(config: HttpTransportConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(config.pool_idle_timeout)
            .gzip(true)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::invalid_request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            platform: PlatformContext::default(),
        })
    }

    /// Injects the platform context (origin + cookie store).
    #[must_use]
    pub fn with_platform(mut self, platform: PlatformContext) -> Self {
        self.platform = platform;
        self
    }

    /// Finalizes the headers that actually hit the wire: default `Accept`,
    /// CSRF header when the request is same-origin or credentialed, and
    /// basic-auth encoding.
    fn wire_headers(&self, config: &RequestConfig, url: &str) -> Headers {
        let mut headers = config.headers.clone().unwrap_or_default();

        if !headers.contains("accept") {
            headers.insert("Accept", "application/json, text/plain, */*");
        }

        if let (Some(cookie_name), Some(header_name)) =
            (&config.xsrf_cookie_name, &config.xsrf_header_name)
        {
            let credentialed = config.with_credentials.unwrap_or(false);
            let same = self
                .platform
                .origin
                .as_ref()
                .is_some_and(|origin| same_origin(url, origin));
            if (credentialed || same)
                && let Some(store) = &self.platform.cookie_store
                && let Some(token) = store.read(cookie_name)
            {
                headers.insert(header_name.clone(), token);
            }
        }

        if let Some(auth) = &config.auth {
            let credentials =
                general_purpose::STANDARD.encode(format!("{}:{}", auth.username, auth.password));
            headers.insert("Authorization", format!("Basic {credentials}"));
        }

        headers
    }

    #[instrument(
        name = "http_send",
        skip(self, config),
        fields(method = %config.method.unwrap_or_default(), timeout_ms = tracing::field::Empty)
    )]
    async fn perform(&self, config: &RequestConfig) -> std::result::Result<RawResponse, TransportError> {
        let url = config.url.as_deref().ok_or_else(|| TransportError::Network {
            message: "transport received a config with no resolved url".to_string(),
            request: None,
        })?;
        let method = config.method.unwrap_or_default();
        let raw = RawRequest {
            method,
            url: url.to_string(),
        };

        let mut request = self.client.request(reqwest_method(method), url);
        for (name, value) in self.wire_headers(config, url).iter() {
            request = request.header(name, value);
        }

        if let Some(data) = &config.data {
            let body = match data {
                Value::String(text) => text.clone(),
                other => serde_json::to_string(other).map_err(|e| TransportError::Network {
                    message: format!("request body serialization failed: {e}"),
                    request: Some(raw.clone()),
                })?,
            };
            if let Some(progress) = &config.on_upload_progress {
                // The body is handed to the pool in one piece; report it as a
                // single completed event.
                let len = body.len() as u64;
                progress.emit(ProgressEvent {
                    loaded: len,
                    total: Some(len),
                });
            }
            request = request.body(body);
        }

        let timeout = config.timeout.unwrap_or(self.config.default_timeout);
        tracing::Span::current().record("timeout_ms", timeout.as_millis() as u64);

        let exchange = self.exchange(request, &raw, config.on_download_progress.as_ref());
        let outcome = match &config.cancel_token {
            Some(token) => {
                tokio::select! {
                    outcome = tokio::time::timeout(timeout, exchange) => outcome,
                    reason = token.cancelled() => {
                        debug!(url = %raw.url, reason = %reason, "request aborted by cancel token");
                        return Err(TransportError::Cancelled(reason));
                    }
                }
            }
            None => tokio::time::timeout(timeout, exchange).await,
        };

        match outcome {
            Ok(result) => result,
            Err(_elapsed) => {
                warn!(url = %raw.url, timeout_ms = %timeout.as_millis(), "HTTP request timed out");
                Err(TransportError::TimedOut { request: Some(raw) })
            }
        }
    }

    async fn exchange(
        &self,
        request: reqwest::RequestBuilder,
        raw: &RawRequest,
        on_download: Option<&ProgressCallback>,
    ) -> std::result::Result<RawResponse, TransportError> {
        let response = request.send().await.map_err(|e| {
            error!(error = %e, url = %raw.url, "HTTP request send failed");
            if e.is_timeout() {
                TransportError::TimedOut {
                    request: Some(raw.clone()),
                }
            } else {
                TransportError::Network {
                    message: format!("request failed: {e}"),
                    request: Some(raw.clone()),
                }
            }
        })?;

        let status = response.status();
        let mut headers = Headers::new();
        for (name, value) in response.headers() {
            headers.insert(name.as_str(), value.to_str().unwrap_or(""));
        }

        let total = response.content_length();
        let mut stream = response.bytes_stream();
        let mut body: Vec<u8> = Vec::new();
        let mut loaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| TransportError::Network {
                message: format!("failed to read response body: {e}"),
                request: Some(raw.clone()),
            })?;
            loaded += chunk.len() as u64;
            if let Some(progress) = on_download {
                progress.emit(ProgressEvent { loaded, total });
            }
            body.extend_from_slice(&chunk);
        }

        debug!(
            status = status.as_u16(),
            body_length = body.len(),
            url = %raw.url,
            "HTTP response received"
        );

        Ok(RawResponse {
            data: Value::String(String::from_utf8_lossy(&body).to_string()),
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            headers,
            request: raw.clone(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, config: &RequestConfig) -> std::result::Result<RawResponse, TransportError> {
        self.perform(config).await
    }
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Delete => reqwest::Method::DELETE,
        Method::Head => reqwest::Method::HEAD,
        Method::Options => reqwest::Method::OPTIONS,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BasicAuth;
    use crate::platform::{MemoryCookieStore, Origin};
    use std::sync::Arc;

    fn transport() -> HttpTransport {
        HttpTransport::new(HttpTransportConfig::default()).expect("client builds")
    }

    #[test]
    fn default_accept_header_is_not_forced_over_user_value() {
        let config = RequestConfig::new().with_header("Accept", "text/csv");
        let headers = transport().wire_headers(&config, "http://a.com/x");
        assert_eq!(headers.get("accept"), Some("text/csv"));
    }

    #[test]
    fn basic_auth_encodes_credentials() {
        let config = RequestConfig::new().with_auth(BasicAuth::new("user", "pass"));
        let headers = transport().wire_headers(&config, "http://a.com/x");
        assert_eq!(headers.get("authorization"), Some("Basic dXNlcjpwYXNz"));
    }

    #[test]
    fn xsrf_header_requires_same_origin_or_credentials() {
        let store = Arc::new(MemoryCookieStore::new());
        store.set("XSRF-TOKEN", "tok");
        let platform = PlatformContext::new(
            Origin::parse("http://same.test"),
            Some(store),
        );
        let transport = transport().with_platform(platform);

        let mut config = RequestConfig::new();
        config.xsrf_cookie_name = Some("XSRF-TOKEN".to_string());
        config.xsrf_header_name = Some("X-XSRF-TOKEN".to_string());

        // cross-origin, not credentialed: no header
        let headers = transport.wire_headers(&config, "http://other.test/x");
        assert_eq!(headers.get("X-XSRF-TOKEN"), None);

        // same-origin: header injected
        let headers = transport.wire_headers(&config, "http://same.test/x");
        assert_eq!(headers.get("X-XSRF-TOKEN"), Some("tok"));

        // cross-origin but credentialed: header injected
        config.with_credentials = Some(true);
        let headers = transport.wire_headers(&config, "http://other.test/x");
        assert_eq!(headers.get("X-XSRF-TOKEN"), Some("tok"));
    }
}
