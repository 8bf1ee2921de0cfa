//! Response-side handling and transformation.
//!
//! # Responsibilities
//! - Assemble the envelope returned to the HTTP caller
//! - Collapse downstream failures into the opaque error marker
//!
//! # Design Decisions
//! - Downstream failure keeps status 200; only the payload reflects it
//! - Client input errors stay plain-text 4xx, no structured error body

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{Map, Value};

/// Marker stored in `call` when the downstream collaborator fails.
pub const CALL_ERROR: &str = "error";

/// JSON envelope combining the request echo with the downstream result.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    /// Whether the inbound body arrived gzip-encoded.
    pub compressed: bool,

    /// The decoded request payload, echoed back.
    pub data: Map<String, Value>,

    /// Downstream message, or [`CALL_ERROR`] when the call failed.
    pub call: String,
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
