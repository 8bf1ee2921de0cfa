//! Process lifecycle coordination.
//!
//! Holds the shutdown broadcast used to stop the serving loop: the binary
//! subscribes the server before spawning it and triggers the channel on
//! ctrl-c; the integration tests trigger it directly.

pub mod shutdown;

pub use shutdown::Shutdown;
