//! Downstream fan-out subsystem.
//!
//! # Data Flow
//! ```text
//! ingress handler
//!     → fanout.rs (spawn task, hand back the single-resolution receiver)
//!     → client.rs (GET collaborator, decode JSON, extract `message`)
//!     → handler resolves the envelope's `call` from the one outcome
//! ```
//!
//! # Design Decisions
//! - One outbound call per inbound request, no poolwide coordination
//! - Success and failure travel over the same channel as a `Result`
//! - Every failure mode is a typed error; none of them crash the task

pub mod client;
pub mod fanout;

pub use client::{UpstreamClient, UpstreamError};
pub use fanout::{spawn_call, CallOutcome};
