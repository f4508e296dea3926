//! Failure taxonomy for parlance RPC calls.
//!
//! Every failure a call can surface is a variant of [`Error`]. Structured
//! server-side failures are carried by [`RemoteError`], which preserves the
//! full wire envelope so callers can branch on the error name.

use std::collections::BTreeMap;

/// Source error type preserved behind failure variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The error type for parlance RPC operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required argument or path variable was absent. Carries the
    /// parameter name in its message.
    #[error("{0}")]
    Precondition(String),

    /// An argument was present but outside its declared domain, or a
    /// response was structurally unusable (e.g. missing Content-Type).
    #[error("{0}")]
    InvalidArgument(String),

    /// The response Content-Type is not handled by any registered encoding.
    #[error("Unsupported Content-Type: {media_type}")]
    UnsupportedMediaType {
        /// The parsed `type/subtype` that no encoding accepted.
        media_type: String,
    },

    /// The request body could not be encoded by the default encoding.
    #[error("{message}")]
    Serialize {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The response body could not be decoded for its negotiated
    /// Content-Type. The underlying parse cause is preserved.
    #[error("{message}")]
    Deserialize {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// A unit-returning endpoint received a non-empty response body.
    #[error("Expected empty response body")]
    EmptyBody,

    /// A structured error returned by the server.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// A transport-level failure: connection refused, TLS handshake
    /// failure, socket reset. These are the only failures the retry
    /// decorator re-runs.
    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// A blocking stub exceeded its caller-specified deadline.
    #[error("Waited {millis} milliseconds")]
    Timeout { millis: u64 },
}

impl Error {
    /// Create a precondition violation naming the offending parameter.
    pub fn precondition(message: impl Into<String>) -> Self {
        Error::Precondition(message.into())
    }

    /// Create an invalid-argument failure.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    /// Create a transport failure without an underlying cause.
    pub fn transport(message: impl Into<String>) -> Self {
        Error::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Create a transport failure preserving the underlying cause.
    pub fn transport_with(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Error::Transport {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a serialization failure preserving the underlying cause.
    pub fn serialize_with(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Error::Serialize {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a deserialization failure without an underlying cause.
    pub fn deserialize(message: impl Into<String>) -> Self {
        Error::Deserialize {
            message: message.into(),
            source: None,
        }
    }

    /// Create a deserialization failure preserving the underlying cause.
    pub fn deserialize_with(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Error::Deserialize {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

/// A structured error returned by a remote service.
///
/// Decoded from the JSON error envelope for responses with a status outside
/// [200, 300). All envelope fields are preserved verbatim; `status` is the
/// HTTP status of the originating response.
#[derive(Debug, Clone, thiserror::Error)]
#[error("RemoteException: {error_code} ({error_name}) with instance ID {error_instance_id}")]
pub struct RemoteError {
    error_code: String,
    error_name: String,
    error_instance_id: String,
    parameters: BTreeMap<String, String>,
    status: u16,
}

impl RemoteError {
    pub fn new(
        error_code: impl Into<String>,
        error_name: impl Into<String>,
        error_instance_id: impl Into<String>,
        parameters: BTreeMap<String, String>,
        status: u16,
    ) -> Self {
        Self {
            error_code: error_code.into(),
            error_name: error_name.into(),
            error_instance_id: error_instance_id.into(),
            parameters,
            status,
        }
    }

    /// The error category name, e.g. `FAILED_PRECONDITION`.
    pub fn error_code(&self) -> &str {
        &self.error_code
    }

    /// The specific error identifier, e.g. `Default:FailedPrecondition`.
    pub fn error_name(&self) -> &str {
        &self.error_name
    }

    /// The opaque per-occurrence identifier assigned by the server.
    pub fn error_instance_id(&self) -> &str {
        &self.error_instance_id
    }

    /// Unstructured parameters attached to the error.
    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    /// The HTTP status of the response this error was decoded from.
    pub fn status(&self) -> u16 {
        self.status
    }
}
