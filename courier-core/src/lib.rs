//! Courier Core Library
//!
//! The request-dispatch core of an async HTTP client: interceptor chains,
//! declarative config merging, a body transform pipeline, cooperative
//! cancellation, and normalized errors around a pluggable transport.
//!
//! # Features
//!
//! - **Interceptors**: registries over outgoing configs and incoming
//!   responses, folded into an execution chain per call
//! - **Config Merging**: per-call configs layered over instance defaults
//! - **Cancellation**: one-shot broadcast tokens observed at well-defined
//!   points of the pipeline
//! - **Error Handling**: every failure normalized into one rich error type
//!   carrying the config and any response received
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use courier_core::{Client, HttpTransport, HttpTransportConfig, RequestConfig};
//!
//! # async fn example() -> courier_core::Result<()> {
//! let transport = Arc::new(HttpTransport::new(HttpTransportConfig::default())?);
//! let client = Client::with_defaults(
//!     transport,
//!     RequestConfig::new().with_base_url("https://api.example.com"),
//! );
//!
//! client.on_request(|config| Ok(config.with_header("X-Request-Source", "courier")));
//!
//! let response = client.get("/widgets", None).await?;
//! println!("{} {}", response.status, response.data);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Global suppressions: these lints apply broadly across the codebase and
// would require excessive local annotations.
// - module_name_repetitions: common pattern in Rust libraries (RequestConfig in config)
// - missing_errors_doc / missing_panics_doc: too verbose for every Result fn
// - must_use_candidate: not all return values need #[must_use]
// - doc_markdown: technical terms in docs don't need backticks (XSRF, JSON)
// - return_self_not_must_use: builder methods return Self without must_use
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]

// Re-exports of external dependencies
pub use serde;
pub use serde_json;

// Core modules
pub mod cancel;
pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod interceptor;
pub mod logging;
pub mod params;
pub mod platform;
pub mod response;
pub mod transform;
pub mod transport;
pub mod url;

// Re-exports of core types for convenience
pub use cancel::{CancelReason, CancelSource, CancelToken};
pub use client::{Client, RequestTarget};
pub use config::{
    BasicAuth, Method, ParamsSerializer, RequestConfig, ResponseType, StatusValidator,
    merge_config,
};
pub use error::{Error, ErrorCode, ErrorDetails, Result};
pub use headers::Headers;
pub use interceptor::{Interceptor, InterceptorId, InterceptorManager};
pub use params::{ParamValue, Params};
pub use platform::{CookieStore, MemoryCookieStore, Origin, PlatformContext};
pub use response::Response;
pub use transform::BodyTransform;
pub use transport::{
    HttpTransport, HttpTransportConfig, ProgressCallback, ProgressEvent, RawRequest, RawResponse,
    Transport, TransportError,
};

/// Prelude module for convenient imports
///
/// Import everything you need with:
/// ```rust
/// use courier_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::cancel::{CancelReason, CancelSource, CancelToken};
    pub use crate::client::{Client, RequestTarget};
    pub use crate::config::{
        BasicAuth, Method, RequestConfig, ResponseType, StatusValidator, merge_config,
    };
    pub use crate::error::{Error, ErrorCode, Result};
    pub use crate::headers::Headers;
    pub use crate::logging::{LogConfig, LogFormat, LogLevel, init_logging, try_init_logging};
    pub use crate::params::{ParamValue, Params};
    pub use crate::response::Response;
    pub use crate::transform::BodyTransform;
    pub use crate::transport::{HttpTransport, HttpTransportConfig, Transport};
    pub use serde::{Deserialize, Serialize};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
