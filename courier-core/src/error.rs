//! Error normalization.
//!
//! Every failure leaving the dispatch pipeline has one consistent shape
//! regardless of origin: a message, an optional machine-readable code, the
//! config that was in effect, the raw transport handle if one existed, and
//! the response if the failure happened after one was received. The [`Error`]
//! type itself is the marker that distinguishes a library-recognized failure
//! from an arbitrary panic or foreign error.
//!
//! Cancellation is deliberately not wrapped in the normalized shape: it
//! carries the caller-supplied reason verbatim.

use std::borrow::Cow;
use std::fmt;

use thiserror::Error as ThisError;

use crate::cancel::CancelReason;
use crate::config::RequestConfig;
use crate::response::Response;
use crate::transport::{RawRequest, TransportError};

/// Result type alias for all courier operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Machine-readable failure code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCode {
    /// The configured timeout elapsed.
    TimedOut,
    /// Transport-level failure before any response.
    Network,
}

impl ErrorCode {
    /// Stable text form of the code.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::TimedOut => "ECONNABORTED",
            ErrorCode::Network => "ERR_NETWORK",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The normalized failure payload carried by every non-cancellation variant.
///
/// Boxed inside [`Error`] to keep the enum small.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ErrorDetails {
    /// Human-readable message.
    pub message: String,
    /// Optional machine-readable code.
    pub code: Option<ErrorCode>,
    /// The effective config the failing request ran with.
    pub config: RequestConfig,
    /// Snapshot of what reached the wire, if the transport got that far.
    pub request: Option<RawRequest>,
    /// The response, if the failure occurred after one was received.
    pub response: Option<Response>,
}

impl fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (code: {code})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// The primary error type for the dispatch pipeline.
#[derive(ThisError, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Transport-level failure before any response was received.
    #[error("network error: {0}")]
    Network(Box<ErrorDetails>),

    /// The configured timeout elapsed.
    #[error("timeout: {0}")]
    Timeout(Box<ErrorDetails>),

    /// A response arrived but the status-acceptance predicate rejected it.
    /// The response is attached and its data has already been transformed.
    #[error("status rejected: {0}")]
    StatusRejected(Box<ErrorDetails>),

    /// The cancel token was, or became, settled.
    #[error("cancelled: {0}")]
    Cancelled(CancelReason),

    /// The request could not be constructed (missing url, unserializable
    /// body, bad method text).
    #[error("invalid request: {0}")]
    InvalidRequest(Cow<'static, str>),
}

impl Error {
    /// Creates a network error for a transport failure with no response.
    pub fn network(
        message: impl Into<String>,
        config: RequestConfig,
        request: Option<RawRequest>,
    ) -> Self {
        Self::Network(Box::new(ErrorDetails {
            message: message.into(),
            code: Some(ErrorCode::Network),
            config,
            request,
            response: None,
        }))
    }

    /// Creates a timeout error; the message carries the configured duration.
    pub fn timeout(config: RequestConfig, request: Option<RawRequest>) -> Self {
        let message = match config.timeout {
            Some(timeout) => format!("timeout of {}ms exceeded", timeout.as_millis()),
            None => "timeout exceeded".to_string(),
        };
        Self::Timeout(Box::new(ErrorDetails {
            message,
            code: Some(ErrorCode::TimedOut),
            config,
            request,
            response: None,
        }))
    }

    /// Creates a status-rejection error with the (already transformed)
    /// response attached so callers can still inspect it.
    pub fn status_rejected(config: RequestConfig, response: Response) -> Self {
        Self::StatusRejected(Box::new(ErrorDetails {
            message: format!("request failed with status code {}", response.status),
            code: None,
            config,
            request: response.request.clone(),
            response: Some(response),
        }))
    }

    /// Creates an invalid-request error.
    /// Accepts both `&'static str` (zero allocation) and `String`.
    pub fn invalid_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Funnels a bare transport rejection into the normalized shape.
    #[must_use]
    pub fn from_transport(err: TransportError, config: RequestConfig) -> Self {
        match err {
            TransportError::Network { message, request } => {
                Self::network(message, config, request)
            }
            TransportError::TimedOut { request } => Self::timeout(config, request),
            TransportError::Cancelled(reason) => Self::Cancelled(reason),
        }
    }

    /// The normalized payload, for every variant that carries one.
    #[must_use]
    pub fn details(&self) -> Option<&ErrorDetails> {
        match self {
            Error::Network(d) | Error::Timeout(d) | Error::StatusRejected(d) => Some(d),
            Error::Cancelled(_) | Error::InvalidRequest(_) => None,
        }
    }

    fn details_mut(&mut self) -> Option<&mut ErrorDetails> {
        match self {
            Error::Network(d) | Error::Timeout(d) | Error::StatusRejected(d) => Some(d),
            Error::Cancelled(_) | Error::InvalidRequest(_) => None,
        }
    }

    /// The config the failing request ran with.
    #[must_use]
    pub fn config(&self) -> Option<&RequestConfig> {
        self.details().map(|d| &d.config)
    }

    /// The machine-readable code, if one applies.
    #[must_use]
    pub fn code(&self) -> Option<ErrorCode> {
        self.details().and_then(|d| d.code)
    }

    /// The raw transport handle, if the request reached the wire.
    #[must_use]
    pub fn request(&self) -> Option<&RawRequest> {
        self.details().and_then(|d| d.request.as_ref())
    }

    /// The attached response, if the failure happened after one arrived.
    #[must_use]
    pub fn response(&self) -> Option<&Response> {
        self.details().and_then(|d| d.response.as_ref())
    }

    /// Mutable access to the attached response, used by the response-stage
    /// transforms.
    pub fn response_mut(&mut self) -> Option<&mut Response> {
        self.details_mut().and_then(|d| d.response.as_mut())
    }

    /// Returns `true` for cooperative-cancellation failures.
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Error::Cancelled(_))
    }
}
