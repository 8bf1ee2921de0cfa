//! Request-side handling and transformation.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) as early as possible
//! - Propagate the request ID onto responses for correlation
//! - Turn the inbound body into the request payload (gzip + JSON)

use std::io::Read;

use axum::http::{HeaderName, HeaderValue, Request};
use flate2::read::GzDecoder;
use serde_json::{Map, Value};
use thiserror::Error;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use uuid::Uuid;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates a UUID v4 request ID for requests that do not carry one.
#[derive(Debug, Clone, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let value = HeaderValue::from_str(&Uuid::new_v4().to_string()).ok()?;
        Some(RequestId::new(value))
    }
}

/// Layer that stamps `x-request-id` on incoming requests.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID), MakeRequestUuid)
}

/// Layer that copies `x-request-id` onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID))
}

/// Error raised while turning an inbound body into a JSON payload.
#[derive(Debug, Error)]
pub enum BodyError {
    /// The body advertised gzip but the stream would not inflate.
    #[error("invalid gzip body: {0}")]
    Gzip(#[source] std::io::Error),

    /// The body is not a single JSON object.
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decode an inbound body into the request payload.
///
/// When `compressed` is set the bytes are inflated first; a broken gzip
/// stream is an error, never a fallback to the raw bytes. The payload must
/// be a single JSON object.
pub fn decode_payload(body: &[u8], compressed: bool) -> Result<Map<String, Value>, BodyError> {
    if compressed {
        let mut inflated = Vec::new();
        GzDecoder::new(body)
            .read_to_end(&mut inflated)
            .map_err(BodyError::Gzip)?;
        Ok(serde_json::from_slice(&inflated)?)
    } else {
        Ok(serde_json::from_slice(body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn test_decodes_plain_object() {
        let payload = decode_payload(br#"{"a":1,"b":"two"}"#, false).unwrap();
        assert_eq!(payload.get("a"), Some(&serde_json::json!(1)));
        assert_eq!(payload.get("b"), Some(&serde_json::json!("two")));
    }

    #[test]
    fn test_decodes_gzip_object() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(br#"{"k":[1,2,3]}"#).unwrap();
        let body = encoder.finish().unwrap();

        let payload = decode_payload(&body, true).unwrap();
        assert_eq!(payload.get("k"), Some(&serde_json::json!([1, 2, 3])));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let result = decode_payload(b"not json", false);
        assert!(matches!(result, Err(BodyError::Json(_))));
    }

    #[test]
    fn test_rejects_non_object_json() {
        assert!(matches!(
            decode_payload(b"[1,2,3]", false),
            Err(BodyError::Json(_))
        ));
        assert!(matches!(
            decode_payload(br#""just a string""#, false),
            Err(BodyError::Json(_))
        ));
    }

    #[test]
    fn test_rejects_raw_bytes_marked_compressed() {
        let result = decode_payload(br#"{"a":1}"#, true);
        assert!(matches!(result, Err(BodyError::Gzip(_))));
    }
}
