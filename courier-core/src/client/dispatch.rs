//! The fixed network step in the middle of every execution chain.

use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::{RequestConfig, ResponseType};
use crate::error::{Error, Result};
use crate::headers::Headers;
use crate::response::Response;
use crate::transform::{
    BodyTransform, apply_transforms, default_request_transform, default_response_transform,
};

use super::Client;

impl Client {
    /// Runs one finalized exchange: cancellation gate, url resolution,
    /// request transforms, header finalization, the transport call, response
    /// transforms and status validation.
    #[instrument(
        name = "dispatch_request",
        skip(self, config),
        fields(method = %config.method.unwrap_or_default(), url = tracing::field::Empty)
    )]
    pub(crate) async fn dispatch(&self, mut config: RequestConfig) -> Result<Response> {
        // Cancellation observation point one: before any I/O.
        if let Some(token) = &config.cancel_token {
            token.throw_if_requested()?;
        }

        let url = crate::url::resolve_url(&config)?;
        tracing::Span::current().record("url", url.as_str());
        config.url = Some(url);

        prepare_body(&mut config)?;
        finalize_headers(&mut config);

        let response_transforms = effective_response_transforms(&config);
        let outcome = self.transport.send(&config).await;

        match outcome {
            Ok(raw) => {
                debug!(status = raw.status, "exchange settled");
                let data = apply_transforms(raw.data, &raw.headers, &response_transforms)?;
                let response = Response {
                    data,
                    status: raw.status,
                    status_text: raw.status_text,
                    headers: raw.headers,
                    request: Some(raw.request),
                    config: config.clone(),
                };

                let accepted = config
                    .validate_status
                    .clone()
                    .unwrap_or_default()
                    .accepts(response.status);
                if accepted {
                    Ok(response)
                } else {
                    // The attached response has already been transformed, so
                    // it is as usable as a success response.
                    Err(Error::status_rejected(config, response))
                }
            }
            Err(transport_err) => Err(Error::from_transport(transport_err, config)),
        }
    }
}

/// Applies the request transform pipeline to the body, defaulting the
/// `Content-Type` for plain-object bodies while they still have their
/// original shape.
fn prepare_body(config: &mut RequestConfig) -> Result<()> {
    let Some(data) = config.data.take() else {
        return Ok(());
    };

    if matches!(data, Value::Object(_)) {
        let headers = config.headers.get_or_insert_with(Headers::new);
        if !headers.contains("content-type") {
            headers.insert("Content-Type", "application/json;charset=utf-8");
        }
    }

    let transforms = config
        .transform_request
        .clone()
        .unwrap_or_else(|| vec![default_request_transform()]);
    let headers = config.headers.get_or_insert_with(Headers::new);
    config.data = Some(apply_transforms(data, headers, &transforms)?);
    Ok(())
}

/// A `Content-Type` header makes no sense without a body.
fn finalize_headers(config: &mut RequestConfig) {
    if config.data.is_none()
        && let Some(headers) = config.headers.as_mut()
    {
        headers.remove("content-type");
    }
}

/// The response pipeline: the caller's list when set, otherwise the default
/// JSON parse — suppressed entirely when the caller asked for raw text.
fn effective_response_transforms(config: &RequestConfig) -> Vec<BodyTransform> {
    match &config.transform_response {
        Some(list) => list.clone(),
        None if config.response_type == Some(ResponseType::Text) => Vec::new(),
        None => vec![default_response_transform()],
    }
}
