//! HTTP ingress subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum router, middleware, ingress handler)
//!     → request.rs (request ID, gzip + JSON payload decoding)
//!     → [upstream fan-out resolves `call`]
//!     → response.rs (envelope serialization)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{BodyError, MakeRequestUuid, X_REQUEST_ID};
pub use response::{Envelope, CALL_ERROR};
pub use server::HttpServer;
