//! Normalized response envelope.

use serde_json::Value;

use crate::config::RequestConfig;
use crate::headers::Headers;
use crate::transport::RawRequest;

/// The settled result of one transport exchange.
///
/// Created once per completed exchange; immutable afterwards except for the
/// in-place data transformation the dispatcher performs before handing it to
/// response interceptors.
#[derive(Debug, Clone)]
pub struct Response {
    /// Response body, already run through the response transform pipeline.
    pub data: Value,
    /// Numeric status code.
    pub status: u16,
    /// Status reason phrase.
    pub status_text: String,
    /// Response headers.
    pub headers: Headers,
    /// The effective config that produced this response.
    pub config: RequestConfig,
    /// Snapshot of what the transport put on the wire.
    pub request: Option<RawRequest>,
}
