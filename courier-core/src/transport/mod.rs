//! Transport adapter boundary.
//!
//! The dispatcher hands a finalized config (headers collapsed, body
//! transformed, url absolute and query-augmented) to a [`Transport`] and gets
//! back either a [`RawResponse`] or a bare [`TransportError`]. Rejections are
//! deliberately not normalized here; the dispatcher funnels them through
//! [`Error::from_transport`](crate::error::Error::from_transport) so every
//! failure origin ends up with the same shape.

mod http;

pub use http::{HttpTransport, HttpTransportConfig};

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::cancel::CancelReason;
use crate::config::{Method, RequestConfig};
use crate::headers::Headers;

/// Snapshot of what the transport put (or tried to put) on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRequest {
    /// Method sent.
    pub method: Method,
    /// Final absolute url sent.
    pub url: String,
}

/// Untransformed exchange result returned by a transport.
///
/// `data` is the raw body (`Value::String` for textual bodies); the
/// dispatcher runs the response transform pipeline over it.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Raw response body.
    pub data: Value,
    /// Numeric status code.
    pub status: u16,
    /// Status reason phrase.
    pub status_text: String,
    /// Response headers.
    pub headers: Headers,
    /// What was sent.
    pub request: RawRequest,
}

/// Upload/download progress notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Bytes moved so far.
    pub loaded: u64,
    /// Total bytes, when known up front.
    pub total: Option<u64>,
}

/// Progress callback carried on the config. Cheap to clone.
#[derive(Clone)]
pub struct ProgressCallback(Arc<dyn Fn(ProgressEvent) + Send + Sync>);

impl ProgressCallback {
    /// Wraps a callback function.
    pub fn new(f: impl Fn(ProgressEvent) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Delivers one progress event.
    pub fn emit(&self, event: ProgressEvent) {
        (self.0)(event);
    }
}

impl fmt::Debug for ProgressCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ProgressCallback")
    }
}

/// Bare transport rejection, pre-normalization.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TransportError {
    /// Connection-level failure before a response existed.
    #[error("{message}")]
    Network {
        /// Failure description from the wire library.
        message: String,
        /// What was being sent, if known.
        request: Option<RawRequest>,
    },

    /// The per-request time budget elapsed.
    #[error("request timed out")]
    TimedOut {
        /// What was being sent, if known.
        request: Option<RawRequest>,
    },

    /// The request's cancel token settled mid-flight.
    #[error("cancelled: {0}")]
    Cancelled(CancelReason),
}

/// A pluggable network backend.
///
/// The config it receives is finalized: lower-case method, absolute
/// query-augmented url, transformed body, collapsed headers. Implementations
/// must honor `timeout` (rejecting with [`TransportError::TimedOut`]),
/// `cancel_token` (aborting in-flight I/O with
/// [`TransportError::Cancelled`]), `response_type`, `with_credentials`, and
/// the progress callbacks.
#[async_trait]
pub trait Transport: fmt::Debug + Send + Sync {
    /// Performs one exchange.
    async fn send(&self, config: &RequestConfig) -> Result<RawResponse, TransportError>;
}
