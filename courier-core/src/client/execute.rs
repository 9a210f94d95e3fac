//! Call-surface normalization and chain folding.
//!
//! `execute` accepts either a full config or a `(url, config?)` pair via the
//! [`RequestTarget`] tagged union, normalizes immediately to one canonical
//! config shape, and folds the execution chain: request interceptors
//! last-registered-first, the fixed network step in the middle, response
//! interceptors first-registered-first. The fold threads a `Result` through
//! the links — a link with no rejection handler lets a failure propagate
//! untouched to the next link that has one, or to the caller.

use serde_json::Value;

use crate::config::{Method, RequestConfig, merge_config};
use crate::error::Result;
use crate::interceptor::Interceptor;
use crate::response::Response;

use super::Client;

/// The two accepted call shapes, normalized at the boundary.
#[derive(Debug)]
pub enum RequestTarget {
    /// A complete request description.
    Config(RequestConfig),
    /// A url with an optional partial config folded around it.
    Url(String, Option<RequestConfig>),
}

impl RequestTarget {
    fn into_config(self) -> RequestConfig {
        match self {
            RequestTarget::Config(config) => config,
            RequestTarget::Url(url, config) => {
                let mut config = config.unwrap_or_default();
                config.url = Some(url);
                config
            }
        }
    }
}

impl From<RequestConfig> for RequestTarget {
    fn from(config: RequestConfig) -> Self {
        RequestTarget::Config(config)
    }
}

impl From<&str> for RequestTarget {
    fn from(url: &str) -> Self {
        RequestTarget::Url(url.to_string(), None)
    }
}

impl From<String> for RequestTarget {
    fn from(url: String) -> Self {
        RequestTarget::Url(url, None)
    }
}

impl From<(&str, RequestConfig)> for RequestTarget {
    fn from((url, config): (&str, RequestConfig)) -> Self {
        RequestTarget::Url(url.to_string(), Some(config))
    }
}

impl From<(String, RequestConfig)> for RequestTarget {
    fn from((url, config): (String, RequestConfig)) -> Self {
        RequestTarget::Url(url, Some(config))
    }
}

fn step<T>(state: Result<T>, link: &Interceptor<T>) -> Result<T> {
    match state {
        Ok(value) => (link.fulfilled)(value),
        Err(err) => match &link.rejected {
            Some(rejected) => rejected(err),
            None => Err(err),
        },
    }
}

impl Client {
    /// Dispatches a request described by a config or a `(url, config)` pair.
    pub async fn execute(&self, target: impl Into<RequestTarget>) -> Result<Response> {
        let overrides = target.into().into_config();
        let mut config = merge_config(self.defaults(), overrides);
        if config.method.is_none() {
            config.method = Some(Method::Get);
        }

        // Each execution folds its own chain from a snapshot; concurrent
        // calls share the registries read-only.
        let request_chain = self.snapshot_request_chain();
        let response_chain = self.snapshot_response_chain();

        let mut state: Result<RequestConfig> = Ok(config);
        for link in request_chain.iter().rev() {
            state = step(state, link);
        }

        let mut outcome: Result<Response> = match state {
            Ok(config) => self.dispatch(config).await,
            Err(err) => Err(err),
        };

        for link in &response_chain {
            outcome = step(outcome, link);
        }

        outcome
    }

    /// GET shorthand.
    pub async fn get(&self, url: &str, config: Option<RequestConfig>) -> Result<Response> {
        self.execute_verb(Method::Get, url, None, config).await
    }

    /// DELETE shorthand.
    pub async fn delete(&self, url: &str, config: Option<RequestConfig>) -> Result<Response> {
        self.execute_verb(Method::Delete, url, None, config).await
    }

    /// HEAD shorthand.
    pub async fn head(&self, url: &str, config: Option<RequestConfig>) -> Result<Response> {
        self.execute_verb(Method::Head, url, None, config).await
    }

    /// OPTIONS shorthand.
    pub async fn options(&self, url: &str, config: Option<RequestConfig>) -> Result<Response> {
        self.execute_verb(Method::Options, url, None, config).await
    }

    /// POST shorthand; `data` becomes the request body.
    pub async fn post(
        &self,
        url: &str,
        data: Option<Value>,
        config: Option<RequestConfig>,
    ) -> Result<Response> {
        self.execute_verb(Method::Post, url, data, config).await
    }

    /// PUT shorthand; `data` becomes the request body.
    pub async fn put(
        &self,
        url: &str,
        data: Option<Value>,
        config: Option<RequestConfig>,
    ) -> Result<Response> {
        self.execute_verb(Method::Put, url, data, config).await
    }

    /// PATCH shorthand; `data` becomes the request body.
    pub async fn patch(
        &self,
        url: &str,
        data: Option<Value>,
        config: Option<RequestConfig>,
    ) -> Result<Response> {
        self.execute_verb(Method::Patch, url, data, config).await
    }

    async fn execute_verb(
        &self,
        method: Method,
        url: &str,
        data: Option<Value>,
        config: Option<RequestConfig>,
    ) -> Result<Response> {
        let mut config = config.unwrap_or_default();
        config.method = Some(method);
        config.url = Some(url.to_string());
        if data.is_some() {
            config.data = data;
        }
        self.execute(config).await
    }
}
