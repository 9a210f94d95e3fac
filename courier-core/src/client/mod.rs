//! Request dispatch client.
//!
//! A [`Client`] pairs instance defaults with two interceptor registries (one
//! over outgoing configs, one over incoming responses) and a pluggable
//! [`Transport`]. Every call to [`Client::execute`] merges the per-call
//! config with the defaults, folds a fresh execution chain from a snapshot of
//! the registries, and drives it to a settled [`Response`] or normalized
//! [`Error`](crate::error::Error).
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
//! let response = client.get("/widgets", None).await?;
//! println!("{}", response.status);
//! # Ok(())
//! # }
//! ```

mod dispatch;
mod execute;


pub use execute::RequestTarget;

use std::sync::{Arc, PoisonError, RwLock};

use crate::config::{RequestConfig, merge_config};
use crate::error::{Error, Result};
use crate::interceptor::{Interceptor, InterceptorId, InterceptorManager};
use crate::response::Response;
use crate::transport::Transport;

/// HTTP dispatch client.
#[derive(Debug)]
pub struct Client {
    defaults: RequestConfig,
    transport: Arc<dyn Transport>,
    request_interceptors: RwLock<InterceptorManager<RequestConfig>>,
    response_interceptors: RwLock<InterceptorManager<Response>>,
}

impl Client {
    /// Creates a client with empty defaults.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_defaults(transport, RequestConfig::default())
    }

    /// Creates a client with instance defaults merged into every call.
    #[must_use]
    pub fn with_defaults(transport: Arc<dyn Transport>, defaults: RequestConfig) -> Self {
        Self {
            defaults,
            transport,
            request_interceptors: RwLock::new(InterceptorManager::new()),
            response_interceptors: RwLock::new(InterceptorManager::new()),
        }
    }

    /// The instance defaults.
    #[must_use]
    pub fn defaults(&self) -> &RequestConfig {
        &self.defaults
    }

    /// Registers a request interceptor. The most recently registered request
    /// interceptor runs first, immediately before the network step.
    pub fn on_request<F>(&self, fulfilled: F) -> InterceptorId
    where
        F: Fn(RequestConfig) -> Result<RequestConfig> + Send + Sync + 'static,
    {
        self.write_requests().register(fulfilled)
    }

    /// Registers a request interceptor with a rejection handler.
    pub fn on_request_with_rejected<F, R>(&self, fulfilled: F, rejected: R) -> InterceptorId
    where
        F: Fn(RequestConfig) -> Result<RequestConfig> + Send + Sync + 'static,
        R: Fn(Error) -> Result<RequestConfig> + Send + Sync + 'static,
    {
        self.write_requests().register_with_rejected(fulfilled, rejected)
    }

    /// Removes a request interceptor. Remaining interceptors keep their
    /// order and handles.
    pub fn remove_request_interceptor(&self, id: InterceptorId) -> bool {
        self.write_requests().remove(id)
    }

    /// Registers a response interceptor. The first registered response
    /// interceptor runs first, immediately after the network step.
    pub fn on_response<F>(&self, fulfilled: F) -> InterceptorId
    where
        F: Fn(Response) -> Result<Response> + Send + Sync + 'static,
    {
        self.write_responses().register(fulfilled)
    }

    /// Registers a response interceptor with a rejection handler.
    pub fn on_response_with_rejected<F, R>(&self, fulfilled: F, rejected: R) -> InterceptorId
    where
        F: Fn(Response) -> Result<Response> + Send + Sync + 'static,
        R: Fn(Error) -> Result<Response> + Send + Sync + 'static,
    {
        self.write_responses().register_with_rejected(fulfilled, rejected)
    }

    /// Removes a response interceptor.
    pub fn remove_response_interceptor(&self, id: InterceptorId) -> bool {
        self.write_responses().remove(id)
    }

    /// Resolves the final url (base joining + query serialization) for a
    /// config merged with the defaults, without dispatching anything.
    pub fn resolve_url(&self, config: RequestConfig) -> Result<String> {
        let merged = merge_config(&self.defaults, config);
        crate::url::resolve_url(&merged)
    }

    pub(crate) fn snapshot_request_chain(&self) -> Vec<Interceptor<RequestConfig>> {
        self.request_interceptors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot()
    }

    pub(crate) fn snapshot_response_chain(&self) -> Vec<Interceptor<Response>> {
        self.response_interceptors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot()
    }

    fn write_requests(
        &self,
    ) -> std::sync::RwLockWriteGuard<'_, InterceptorManager<RequestConfig>> {
        self.request_interceptors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_responses(&self) -> std::sync::RwLockWriteGuard<'_, InterceptorManager<Response>> {
        self.response_interceptors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
