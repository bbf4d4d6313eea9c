//! Upstream transport abstraction.
//!
//! The source never opens sessions itself. It is handed an [`Upstream`] at
//! initialization and reuses it, read-only, for every request:
//! - `memory`: in-memory upstream backed by a connection snapshot

pub mod memory;

pub use memory::{InMemoryUpstream, Snapshot};

use crate::error::SourceResult;
use crate::models::{Request, Response};
use std::future::Future;

/// Trait for management-protocol transports.
///
/// Implementations own session setup and any retry policy; the source only
/// sends requests and interprets replies.
pub trait Upstream: Send + Sync {
    /// Send a request that may produce several replies.
    fn send_messages(
        &self,
        request: Request,
    ) -> impl Future<Output = SourceResult<Vec<Response>>> + Send;

    /// Send a request that produces exactly one reply.
    fn send_message(&self, request: Request) -> impl Future<Output = SourceResult<Response>> + Send;

    /// Get the name of this upstream for logging.
    fn name(&self) -> &'static str;
}
