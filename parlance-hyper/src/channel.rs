//! The transport-backed channel.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use http::header::CONTENT_TYPE;
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use rustls::ClientConfig;
use tracing::debug;

use parlance_core::{Channel, Endpoint, Error, Request, Response, ResponseBody, UrlBuilder};

use crate::body::TransportBody;
use crate::connector::build_https_connector;

type HyperClient = Client<HttpsConnector<HttpConnector>, TransportBody>;

/// A [`Channel`] that performs the HTTP exchange with hyper.
///
/// For every call it seeds a fresh [`UrlBuilder`] with the channel's base
/// URL, renders the endpoint path, appends query parameters in order,
/// copies header parameters verbatim, streams the body (setting
/// `Content-Type` from the body, or omitting both for body-less
/// requests), and issues the call with the endpoint's method.
///
/// The response is conveyed as-is: status preserved verbatim (non-2xx
/// included), `Content-Type` taken from the header when present, body
/// handed over as a stream that is never inspected here. Redirects are
/// not followed. Connection pooling, TLS, and protocol negotiation live
/// in the underlying hyper client.
#[derive(Clone)]
pub struct HyperChannel {
    client: HyperClient,
    base: BaseUrl,
}

impl std::fmt::Debug for HyperChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperChannel")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

impl HyperChannel {
    /// Create a channel builder for the given base URL.
    pub fn builder(base_url: impl Into<String>) -> HyperChannelBuilder {
        HyperChannelBuilder::new(base_url)
    }

    /// Create a channel with default transport settings.
    pub fn new(base_url: impl Into<String>) -> Result<Self, Error> {
        Self::builder(base_url).build()
    }
}

#[async_trait]
impl Channel for HyperChannel {
    async fn execute(
        &self,
        endpoint: &dyn Endpoint,
        request: &Request,
    ) -> Result<Response, Error> {
        let mut url = self.base.url_builder();
        endpoint.render_path(request.path_params(), &mut url)?;
        for (name, value) in request.query_params() {
            url.query_param(name, value);
        }
        let url = url.build();

        let method = endpoint.http_method();
        debug!(%method, %url, "executing request");

        let mut builder = http::Request::builder().method(method).uri(url.as_str());
        for (name, value) in request.header_params() {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let body = match request.body() {
            Some(body) => {
                builder = builder.header(CONTENT_TYPE, body.content_type());
                TransportBody::full(body.content())
            }
            None => TransportBody::empty(),
        };
        let request = builder
            .body(body)
            .map_err(|e| Error::invalid_argument(format!("Failed to build request: {e}")))?;

        let response = self.client.request(request).await.map_err(|e| {
            let message = format!("Failed to execute request: {e}");
            Error::transport_with(message, e)
        })?;

        let code = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = ResponseBody::streaming(body_to_stream(response.into_body()));
        Ok(Response::new(code, content_type, body))
    }
}

/// Convert a hyper body into the runtime's chunk stream.
fn body_to_stream(body: Incoming) -> impl Stream<Item = Result<Bytes, Error>> + Send + 'static {
    futures::stream::unfold(body, |mut body| async move {
        match body.frame().await {
            Some(Ok(frame)) => {
                // Trailers surface as an empty chunk, which consumers skip.
                let data = frame.into_data().unwrap_or_default();
                Some((Ok(data), body))
            }
            Some(Err(e)) => {
                let message = format!("Failed to read response body: {e}");
                Some((Err(Error::transport_with(message, e)), body))
            }
            None => None,
        }
    })
}

#[derive(Debug, Clone)]
struct BaseUrl {
    scheme: String,
    host: String,
    port: u16,
}

impl BaseUrl {
    fn parse(raw: &str) -> Result<Self, Error> {
        let url = url::Url::parse(raw)
            .map_err(|e| Error::invalid_argument(format!("Invalid base URL {raw:?}: {e}")))?;
        let scheme = url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(Error::invalid_argument(format!(
                "Base URL scheme must be http or https, got {scheme:?}"
            )));
        }
        let host = url
            .host_str()
            .ok_or_else(|| Error::invalid_argument("Base URL must include a host"))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| Error::invalid_argument("Base URL must include a port"))?;
        Ok(Self {
            scheme: scheme.to_string(),
            host: host.to_string(),
            port,
        })
    }

    fn url_builder(&self) -> UrlBuilder {
        UrlBuilder::new(self.scheme.as_str(), self.host.as_str(), self.port)
    }
}

/// Builder for [`HyperChannel`].
#[derive(Debug)]
pub struct HyperChannelBuilder {
    base_url: String,
    tls_config: Option<ClientConfig>,
    pool_idle_timeout: Option<Duration>,
    pool_max_idle_per_host: usize,
}

impl HyperChannelBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            tls_config: None,
            pool_idle_timeout: Some(Duration::from_secs(90)),
            pool_max_idle_per_host: 32,
        }
    }

    /// Set a custom TLS configuration (custom roots, mTLS, ...).
    pub fn tls_config(mut self, config: ClientConfig) -> Self {
        self.tls_config = Some(config);
        self
    }

    /// Close pooled connections idle for longer than `timeout`.
    ///
    /// Default: 90 seconds.
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = Some(timeout);
        self
    }

    /// Maximum idle connections kept per host.
    ///
    /// Default: 32.
    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    pub fn build(self) -> Result<HyperChannel, Error> {
        let base = BaseUrl::parse(&self.base_url)?;
        let connector = build_https_connector(self.tls_config);

        let mut builder = Client::builder(TokioExecutor::new());
        builder.pool_timer(TokioTimer::new());
        if let Some(timeout) = self.pool_idle_timeout {
            builder.pool_idle_timeout(timeout);
        }
        builder.pool_max_idle_per_host(self.pool_max_idle_per_host);

        Ok(HyperChannel {
            client: builder.build(connector),
            base,
        })
    }
}
