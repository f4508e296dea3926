//! Retry decorator.

use async_trait::async_trait;
use tracing::debug;

use crate::{Channel, Endpoint, Error, Request, Response};

/// A channel decorator that re-executes calls failed by the transport.
///
/// Only [`Error::Transport`] failures are retried — responses with
/// non-2xx status are delivered as successes, and every other failure
/// kind (decoding, content negotiation, precondition violations) is
/// surfaced immediately regardless of attempts remaining. Attempts run
/// sequentially and immediately: attempt `k+1` starts only after attempt
/// `k` has failed, with no backoff. The same request value is replayed
/// for every attempt, which is sound because request bodies are
/// replayable by construction.
///
/// After `max_attempts` failures the last failure is surfaced. Dropping
/// the outer future cancels the in-flight inner attempt; no further
/// attempt is started.
#[derive(Debug, Clone)]
pub struct RetryingChannel<C> {
    inner: C,
    max_attempts: u32,
}

impl<C> RetryingChannel<C> {
    /// Wrap `inner`, allowing up to `max_attempts` executions in total.
    ///
    /// # Panics
    ///
    /// Panics if `max_attempts` is zero.
    pub fn new(inner: C, max_attempts: u32) -> Self {
        assert!(max_attempts >= 1, "max_attempts must be at least 1");
        Self {
            inner,
            max_attempts,
        }
    }
}

#[async_trait]
impl<C: Channel> Channel for RetryingChannel<C> {
    async fn execute(
        &self,
        endpoint: &dyn Endpoint,
        request: &Request,
    ) -> Result<Response, Error> {
        let mut attempt = 1;
        loop {
            match self.inner.execute(endpoint, request).await {
                Ok(response) => return Ok(response),
                Err(err @ Error::Transport { .. }) if attempt < self.max_attempts => {
                    debug!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %err,
                        "retrying after transport failure"
                    );
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use http::Method;

    use super::*;
    use crate::{ResponseBody, UrlBuilder};

    struct TestEndpoint;

    impl Endpoint for TestEndpoint {
        fn render_path(
            &self,
            _params: &BTreeMap<String, String>,
            _url: &mut UrlBuilder,
        ) -> Result<(), Error> {
            Ok(())
        }

        fn http_method(&self) -> Method {
            Method::GET
        }
    }

    /// Fails the first `failures` calls, then succeeds.
    #[derive(Debug)]
    struct FlakyChannel {
        failures: u32,
        calls: AtomicU32,
    }

    impl FlakyChannel {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Channel for FlakyChannel {
        async fn execute(
            &self,
            _endpoint: &dyn Endpoint,
            _request: &Request,
        ) -> Result<Response, Error> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(Error::transport("connection reset"))
            } else {
                Ok(Response::new(200, None, ResponseBody::empty()))
            }
        }
    }

    #[tokio::test]
    async fn test_no_failures() {
        let inner = Arc::new(FlakyChannel::new(0));
        let retryer = RetryingChannel::new(inner.clone(), 3);
        let response = retryer.execute(&TestEndpoint, &Request::default()).await;
        assert_eq!(response.unwrap().code(), 200);
        assert_eq!(inner.calls(), 1);
    }

    #[tokio::test]
    async fn test_retries_up_to_max_attempts() {
        let inner = Arc::new(FlakyChannel::new(2));
        let retryer = RetryingChannel::new(inner.clone(), 3);
        let response = retryer.execute(&TestEndpoint, &Request::default()).await;
        assert_eq!(response.unwrap().code(), 200);
        assert_eq!(inner.calls(), 3);
    }

    #[tokio::test]
    async fn test_exhausted_retries_surface_last_failure() {
        let inner = Arc::new(FlakyChannel::new(u32::MAX));
        let retryer = RetryingChannel::new(inner.clone(), 3);
        let err = retryer
            .execute(&TestEndpoint, &Request::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport { .. }));
        assert_eq!(inner.calls(), 3);
    }

    #[tokio::test]
    async fn test_non_success_status_is_not_retried() {
        #[derive(Debug)]
        struct ServerError {
            calls: AtomicU32,
        }

        #[async_trait]
        impl Channel for ServerError {
            async fn execute(
                &self,
                _endpoint: &dyn Endpoint,
                _request: &Request,
            ) -> Result<Response, Error> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Ok(Response::new(500, None, ResponseBody::empty()))
            }
        }

        let inner = Arc::new(ServerError {
            calls: AtomicU32::new(0),
        });
        let retryer = RetryingChannel::new(inner.clone(), 3);
        let response = retryer.execute(&TestEndpoint, &Request::default()).await;
        assert_eq!(response.unwrap().code(), 500);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_non_transport_failure_is_not_retried() {
        #[derive(Debug)]
        struct FailingChannel {
            error: fn() -> Error,
            calls: AtomicU32,
        }

        #[async_trait]
        impl Channel for FailingChannel {
            async fn execute(
                &self,
                _endpoint: &dyn Endpoint,
                _request: &Request,
            ) -> Result<Response, Error> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Err((self.error)())
            }
        }

        let failures: [fn() -> Error; 2] = [
            || Error::invalid_argument("Response is missing Content-Type header"),
            || Error::precondition("No value provided for path parameter widgetId"),
        ];
        for error in failures {
            let inner = Arc::new(FailingChannel {
                error,
                calls: AtomicU32::new(0),
            });
            let retryer = RetryingChannel::new(inner.clone(), 3);
            let err = retryer
                .execute(&TestEndpoint, &Request::default())
                .await
                .unwrap_err();
            assert!(!matches!(err, Error::Transport { .. }));
            assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    #[should_panic(expected = "max_attempts must be at least 1")]
    fn test_zero_attempts_rejected() {
        RetryingChannel::new(FlakyChannel::new(0), 0);
    }
}
