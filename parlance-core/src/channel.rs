//! The channel seam.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{Endpoint, Error, Request, Response};

/// The uniform seam between generated stubs, decorators, and transports.
///
/// A channel executes one request against one endpoint and resolves with
/// the transport's response or a failure. It is the sole composition point
/// for cross-cutting behavior: retry and error decoding are channels
/// wrapping an inner channel.
///
/// Implementations hold no per-call mutable state and are safe for
/// concurrent use by any number of callers. Dropping the returned future
/// cancels the in-flight call.
#[async_trait]
pub trait Channel: Send + Sync + std::fmt::Debug {
    /// Execute `request` against `endpoint`.
    ///
    /// Responses with non-2xx status are successes at this layer;
    /// failures are transport-level problems (or, for decorated channels,
    /// whatever their decorators surface).
    async fn execute(&self, endpoint: &dyn Endpoint, request: &Request)
        -> Result<Response, Error>;
}

#[async_trait]
impl<C: Channel + ?Sized> Channel for Arc<C> {
    async fn execute(
        &self,
        endpoint: &dyn Endpoint,
        request: &Request,
    ) -> Result<Response, Error> {
        (**self).execute(endpoint, request).await
    }
}
