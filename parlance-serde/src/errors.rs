//! Decoding of structured remote errors.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use parlance_core::{Channel, Endpoint, Error, RemoteError, Request, Response};

use crate::body::parse_media_type;
use crate::json::APPLICATION_JSON;

/// The JSON wire envelope for structured service errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializableError {
    error_code: String,
    error_name: String,
    #[serde(default)]
    error_instance_id: String,
    #[serde(default)]
    parameters: BTreeMap<String, String>,
}

impl SerializableError {
    pub fn new(
        error_code: impl Into<String>,
        error_name: impl Into<String>,
        error_instance_id: impl Into<String>,
        parameters: BTreeMap<String, String>,
    ) -> Self {
        Self {
            error_code: error_code.into(),
            error_name: error_name.into(),
            error_instance_id: error_instance_id.into(),
            parameters,
        }
    }

    pub fn error_code(&self) -> &str {
        &self.error_code
    }

    pub fn error_name(&self) -> &str {
        &self.error_name
    }

    pub fn error_instance_id(&self) -> &str {
        &self.error_instance_id
    }

    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }
}

/// Interprets non-success responses as structured [`RemoteError`]s.
///
/// All statuses outside [200, 300) are decoded uniformly, 3xx included —
/// the runtime never follows redirects. The decoder requires an
/// `application/json` media type (parameters such as `charset` are
/// tolerated), a non-empty body, and a parseable envelope; anything else
/// is a decoding failure rather than a remote error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorDecoder;

impl ErrorDecoder {
    pub async fn decode(&self, response: Response) -> Result<RemoteError, Error> {
        let status = response.code();
        let is_json = response
            .content_type()
            .map(|header| parse_media_type(header) == APPLICATION_JSON)
            .unwrap_or(false);
        if !is_json {
            return Err(Error::deserialize(format!(
                "Failed to interpret response body as SerializableError: {{code={status}}}"
            )));
        }

        let body = response.into_body().collect().await?;
        if body.is_empty() {
            return Err(Error::deserialize(format!(
                "Failed to deserialize response body as JSON, could not deserialize \
                 SerializableError: {{code={status}}}"
            )));
        }

        match serde_json::from_slice::<SerializableError>(&body) {
            Ok(envelope) => Ok(RemoteError::new(
                envelope.error_code,
                envelope.error_name,
                envelope.error_instance_id,
                envelope.parameters,
                status,
            )),
            Err(cause) => Err(Error::deserialize_with(
                format!("Failed to interpret response body as SerializableError: {{code={status}}}"),
                cause,
            )),
        }
    }
}

/// A channel decorator that turns non-2xx responses into
/// [`Error::Remote`] failures.
///
/// Successful statuses pass through untouched. This decorator is composed
/// outside the retry layer so that retries only ever observe transport
/// failures.
#[derive(Debug, Clone)]
pub struct ErrorDecodingChannel<C> {
    inner: C,
    decoder: ErrorDecoder,
}

impl<C> ErrorDecodingChannel<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            decoder: ErrorDecoder,
        }
    }
}

#[async_trait]
impl<C: Channel> Channel for ErrorDecodingChannel<C> {
    async fn execute(
        &self,
        endpoint: &dyn Endpoint,
        request: &Request,
    ) -> Result<Response, Error> {
        let response = self.inner.execute(endpoint, request).await?;
        if (200..300).contains(&response.code()) {
            return Ok(response);
        }
        match self.decoder.decode(response).await {
            Ok(remote) => Err(Error::Remote(remote)),
            Err(err) => Err(err),
        }
    }
}
