//! Single-call fan-out.
//!
//! The inbound handler spawns one task per request and rendezvouses on a
//! single-resolution channel. Success and failure share the channel as a
//! `Result`, so nothing is left undrained when the handler returns early.

use tokio::sync::oneshot;

use crate::upstream::client::{UpstreamClient, UpstreamError};

/// Outcome channel for one downstream call.
pub type CallOutcome = oneshot::Receiver<Result<String, UpstreamError>>;

/// Dispatch the downstream call on its own task.
///
/// Returns immediately; the receiver resolves once the call completes or
/// fails. Exactly one value is sent per request lifecycle. A dropped sender
/// (the task aborted) surfaces as a receive error on the caller's side.
pub fn spawn_call(client: UpstreamClient) -> CallOutcome {
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let outcome = client.fetch_message().await;
        // The receiver may be gone if the ingress request was cancelled.
        let _ = tx.send(outcome);
    });

    rx
}
