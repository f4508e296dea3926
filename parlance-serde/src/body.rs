//! Content-negotiating body serialization.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use parlance_core::{Error, RequestBody, Response, TypeMarker};

use crate::encoding::{Encoding, Slot};

const DESERIALIZE_FAILURE: &str = "Failed to deserialize response stream. Syntax error?";

/// The content-negotiating façade over an ordered list of encodings.
///
/// The list is non-empty and its order is the serialization preference
/// order: request bodies are always produced with the first encoding,
/// while response bodies are decoded with the first encoding that supports
/// the response's media type. Built once per client and shared by every
/// call.
#[derive(Debug, Clone)]
pub struct BodySerDe {
    encodings: Vec<Arc<dyn Encoding>>,
}

impl BodySerDe {
    /// Create a serde over `encodings`, first entry being the default.
    ///
    /// # Panics
    ///
    /// Panics when `encodings` is empty or when two encodings claim the
    /// same primary content type; both are static misconfigurations.
    pub fn new(encodings: Vec<Arc<dyn Encoding>>) -> Self {
        assert!(!encodings.is_empty(), "at least one encoding is required");
        let mut seen = std::collections::BTreeSet::new();
        for encoding in &encodings {
            let content_type = encoding.content_type().to_ascii_lowercase();
            assert!(
                seen.insert(content_type),
                "duplicate encoding registered for content type {}",
                encoding.content_type()
            );
        }
        Self { encodings }
    }

    /// A serializer for `T` bound to the default (first) encoding.
    pub fn serializer<T: Serialize>(&self) -> Serializer<T> {
        Serializer {
            encoding: self.encodings[0].clone(),
            marker: TypeMarker::new(),
        }
    }

    /// A deserializer for `T` negotiating across all registered encodings.
    pub fn deserializer<T: DeserializeOwned>(&self) -> Deserializer<T> {
        Deserializer {
            encodings: self.encodings.clone(),
            marker: TypeMarker::new(),
        }
    }

    /// The deserializer for unit-returning endpoints.
    pub fn empty_body_deserializer(&self) -> EmptyBodyDeserializer {
        EmptyBodyDeserializer
    }
}

/// Serializes values of one type into replayable request bodies.
///
/// Obtained once per stub from [`BodySerDe::serializer`] and reused for
/// every call.
#[derive(Debug, Clone)]
pub struct Serializer<T> {
    encoding: Arc<dyn Encoding>,
    #[allow(dead_code)]
    marker: TypeMarker<T>,
}

impl<T: Serialize> Serializer<T> {
    /// Encode `value` with the default encoding. The resulting body
    /// carries that encoding's content type regardless of what the server
    /// later responds with.
    pub fn serialize(&self, value: &T) -> Result<RequestBody, Error> {
        let bytes = self
            .encoding
            .to_bytes(value)
            .map_err(|cause| Error::serialize_with("Failed to serialize request body", cause))?;
        Ok(RequestBody::new(bytes, self.encoding.content_type().to_string()))
    }
}

/// Deserializes responses into values of one type, negotiating the
/// encoding from the response's `Content-Type` header.
#[derive(Debug, Clone)]
pub struct Deserializer<T> {
    encodings: Vec<Arc<dyn Encoding>>,
    #[allow(dead_code)]
    marker: TypeMarker<T>,
}

impl<T: DeserializeOwned> Deserializer<T> {
    /// Decode `response` into a `T`.
    ///
    /// Fails with [`Error::InvalidArgument`] when the response has no
    /// `Content-Type` header, [`Error::UnsupportedMediaType`] when no
    /// registered encoding supports the parsed media type, and
    /// [`Error::Deserialize`] when the negotiated encoding rejects the
    /// body.
    pub async fn deserialize(&self, response: Response) -> Result<T, Error> {
        let media_type = response
            .content_type()
            .map(parse_media_type)
            .ok_or_else(|| Error::invalid_argument("Response is missing Content-Type header"))?;
        let encoding = self
            .encodings
            .iter()
            .find(|encoding| encoding.supports_content_type(&media_type))
            .cloned()
            .ok_or_else(|| Error::UnsupportedMediaType {
                media_type: media_type.clone(),
            })?;

        let bytes = response.into_body().collect().await?;
        let mut slot = Slot(None);
        encoding
            .from_bytes(&bytes, &mut slot)
            .map_err(|cause| Error::deserialize_with(DESERIALIZE_FAILURE, cause))?;
        slot.0.ok_or_else(|| Error::deserialize(DESERIALIZE_FAILURE))
    }
}

/// Deserializer for unit-returning endpoints.
///
/// Reads up to the first byte of the body: any content at all is a
/// protocol violation. The `Content-Type` header is not consulted.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyBodyDeserializer;

impl EmptyBodyDeserializer {
    pub async fn deserialize(&self, response: Response) -> Result<(), Error> {
        if response.into_body().has_content().await? {
            Err(Error::EmptyBody)
        } else {
            Ok(())
        }
    }
}

/// Extract the lowercased `type/subtype` portion of a `Content-Type`
/// header, discarding parameters such as `charset`.
pub(crate) fn parse_media_type(header: &str) -> String {
    header
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
