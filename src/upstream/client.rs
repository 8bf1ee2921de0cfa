//! Downstream HTTP client.
//!
//! # Responsibilities
//! - Issue the single GET against the configured collaborator
//! - Enforce the configured deadline
//! - Decode the JSON body and extract the `message` field fallibly

use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Uri};
use hyper::body::Incoming;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::{TimeoutConfig, UpstreamConfig};

/// Cap on bytes read from an upstream response body.
const MAX_RESPONSE_BYTES: usize = 1024 * 1024;

/// Errors raised by the downstream call.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The configured URL does not parse as a URI.
    #[error("invalid upstream URL: {0}")]
    InvalidUrl(#[from] axum::http::uri::InvalidUri),

    /// Building the outbound request failed.
    #[error("failed to build upstream request: {0}")]
    Request(#[from] axum::http::Error),

    /// The connection or exchange failed.
    #[error("upstream request failed: {0}")]
    Connect(#[from] hyper_util::client::legacy::Error),

    /// The response body could not be read.
    #[error("failed to read upstream body: {0}")]
    Body(#[source] axum::Error),

    /// The response body is not a JSON object.
    #[error("upstream returned invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response object has no string `message` field.
    #[error("upstream response has no string `message` field")]
    MissingMessage,

    /// The call exceeded its deadline.
    #[error("upstream call timed out after {0:?}")]
    Timeout(Duration),
}

/// Client for the single downstream collaborator.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client<HttpConnector, Body>,
    url: Uri,
    deadline: Duration,
}

impl UpstreamClient {
    /// Create a client for the configured collaborator.
    pub fn new(
        upstream: &UpstreamConfig,
        timeouts: &TimeoutConfig,
    ) -> Result<Self, UpstreamError> {
        let url: Uri = upstream.url.parse()?;
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Ok(Self {
            client,
            url,
            deadline: Duration::from_secs(timeouts.upstream_secs),
        })
    }

    /// GET the collaborator and extract its `message`.
    ///
    /// Every failure mode maps to an [`UpstreamError`]; callers collapse
    /// them into the envelope's error marker. Non-2xx statuses are not
    /// rejected here: a body with a string `message` counts as success.
    pub async fn fetch_message(&self) -> Result<String, UpstreamError> {
        tracing::debug!(url = %self.url, "Calling downstream service");

        let request = Request::builder()
            .method(Method::GET)
            .uri(self.url.clone())
            .body(Body::empty())?;

        let response: axum::http::Response<Incoming> =
            tokio::time::timeout(self.deadline, self.client.request(request))
                .await
                .map_err(|_| UpstreamError::Timeout(self.deadline))??;

        let status = response.status();
        let bytes = axum::body::to_bytes(Body::new(response.into_body()), MAX_RESPONSE_BYTES)
            .await
            .map_err(UpstreamError::Body)?;

        tracing::debug!(
            status = %status,
            bytes = bytes.len(),
            "Downstream response received"
        );

        let document: Map<String, Value> = serde_json::from_slice(&bytes)?;
        message_from(&document).ok_or(UpstreamError::MissingMessage)
    }
}

/// Extract the `message` field when it is a string.
fn message_from(document: &Map<String, Value>) -> Option<String> {
    match document.get("message") {
        Some(Value::String(message)) => Some(message.clone()),
        _ => None,
    }
}
