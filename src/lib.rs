//! JSON Ingress Gateway
//!
//! Accepts `POST /` carrying an optionally gzip-compressed JSON object, fans
//! out one concurrent GET to a configured downstream collaborator, and
//! answers with an envelope echoing the payload alongside the collaborator's
//! message.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
