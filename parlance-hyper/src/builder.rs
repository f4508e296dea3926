//! Assembly of the client-facing channel stack.

use std::sync::Arc;
use std::time::Duration;

use rustls::ClientConfig;

use parlance_core::{Channel, Error, RetryingChannel};
use parlance_serde::ErrorDecodingChannel;

use crate::channel::HyperChannel;

/// Default number of attempts for the retry layer.
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Builds the channel stack generated stubs are pointed at:
/// error-decoding over retrying over the hyper transport.
///
/// The retry layer sits inside the error-decoding layer, so retries only
/// ever observe transport failures while callers observe structured
/// [`RemoteError`](parlance_core::RemoteError)s for non-2xx responses.
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: String,
    max_attempts: u32,
    tls_config: Option<ClientConfig>,
    pool_idle_timeout: Option<Duration>,
}

impl ClientBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            tls_config: None,
            pool_idle_timeout: None,
        }
    }

    /// Total attempts per call, including the first. Default: 3.
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set a custom TLS configuration for the transport.
    pub fn tls_config(mut self, config: ClientConfig) -> Self {
        self.tls_config = Some(config);
        self
    }

    /// Close pooled connections idle for longer than `timeout`.
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<Arc<dyn Channel>, Error> {
        let mut transport = HyperChannel::builder(self.base_url);
        if let Some(config) = self.tls_config {
            transport = transport.tls_config(config);
        }
        if let Some(timeout) = self.pool_idle_timeout {
            transport = transport.pool_idle_timeout(timeout);
        }
        let transport = transport.build()?;
        let channel = ErrorDecodingChannel::new(RetryingChannel::new(transport, self.max_attempts));
        Ok(Arc::new(channel))
    }
}
