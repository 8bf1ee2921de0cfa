//! HTTP server setup and the ingress handler.
//!
//! # Responsibilities
//! - Create the axum Router with the single ingest route
//! - Wire up middleware (tracing, timeout, body limit, request ID)
//! - Bind server to listener and serve with graceful shutdown
//! - Decode inbound payloads and fan out to the upstream collaborator
//! - Observability (metrics, correlation IDs)

use std::time::{Duration, Instant};

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GatewayConfig;
use crate::http::request::{self, decode_payload, BodyError, X_REQUEST_ID};
use crate::http::response::{Envelope, CALL_ERROR};
use crate::observability::metrics;
use crate::upstream::{spawn_call, UpstreamClient, UpstreamError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: UpstreamClient,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, UpstreamError> {
        let upstream = UpstreamClient::new(&config.upstream, &config.timeouts)?;
        let state = AppState { upstream };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/", post(ingest))
            .method_not_allowed_fallback(method_not_allowed)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_size))
            .layer(request::propagate_request_id_layer())
            .layer(request::set_request_id_layer())
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Ingress handler: decode the payload, fan out, respond with the envelope.
async fn ingest(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let start_time = Instant::now();
    let request_id = headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    // Exact-match detection; anything else is treated as an uncompressed body.
    let compressed = headers
        .get(header::CONTENT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == "gzip")
        .unwrap_or(false);

    let data = match decode_payload(&body, compressed) {
        Ok(data) => data,
        Err(err) => {
            tracing::debug!(
                request_id = %request_id,
                error = %err,
                "Rejecting inbound payload"
            );
            let reason = match err {
                BodyError::Gzip(_) => "Invalid gzip encoding",
                BodyError::Json(_) => "Invalid JSON format",
            };
            metrics::record_request("POST", 400, start_time);
            return (StatusCode::BAD_REQUEST, reason).into_response();
        }
    };

    // One concurrent downstream call per request; this task suspends on the
    // single-resolution outcome channel.
    let outcome = spawn_call(state.upstream);

    let call = match outcome.await {
        Ok(Ok(message)) => message,
        Ok(Err(err)) => {
            tracing::warn!(
                request_id = %request_id,
                error = %err,
                "Upstream call failed"
            );
            metrics::record_upstream_failure();
            CALL_ERROR.to_string()
        }
        Err(_) => {
            tracing::warn!(
                request_id = %request_id,
                "Upstream task dropped before resolving"
            );
            metrics::record_upstream_failure();
            CALL_ERROR.to_string()
        }
    };

    metrics::record_request("POST", 200, start_time);
    Envelope {
        compressed,
        data,
        call,
    }
    .into_response()
}

/// Sole route is `POST /`; everything else is refused before body processing.
async fn method_not_allowed() -> impl IntoResponse {
    (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let config = GatewayConfig::default();
        let state = AppState {
            upstream: UpstreamClient::new(&config.upstream, &config.timeouts).unwrap(),
        };
        HttpServer::build_router(&config, state)
    }

    #[tokio::test]
    async fn test_get_is_method_not_allowed() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_delete_is_method_not_allowed() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/")
                    .body(Body::from(r#"{"a":1}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_bad_json_is_rejected_before_fan_out() {
        // The default upstream points nowhere, but a malformed body must be
        // refused before any downstream call is attempted.
        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .body(Body::from("not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
