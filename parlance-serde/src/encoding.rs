//! The encoding plugin contract.

use std::fmt;

use parlance_core::BoxError;

/// A content-type-tagged codec for typed values.
///
/// Encodings are registered with [`BodySerDe`](crate::BodySerDe) in
/// preference order at runtime construction and shared by every call. The
/// typed entry points are erased here so a heterogeneous registry stays
/// object-safe; [`BodySerDe`] re-monomorphizes them at the stub site.
///
/// Implementations must accept their own primary content type:
/// `supports_content_type(content_type())` is always true.
pub trait Encoding: Send + Sync + fmt::Debug {
    /// The primary content type this encoding produces, e.g.
    /// `application/json`.
    fn content_type(&self) -> &str;

    /// Whether this encoding can decode bodies of the given media type.
    /// The argument is the parsed `type/subtype` portion of a
    /// `Content-Type` header, lowercased, with parameters removed.
    fn supports_content_type(&self, media_type: &str) -> bool;

    /// Encode `value` into this encoding's wire form.
    fn to_bytes(&self, value: &dyn erased_serde::Serialize) -> Result<Vec<u8>, BoxError>;

    /// Decode `bytes` into the caller-provided sink. The sink carries the
    /// concrete target type; the encoding supplies the format.
    fn from_bytes(&self, bytes: &[u8], sink: &mut dyn DeserializeSink) -> Result<(), BoxError>;
}

/// The typed receiving end of [`Encoding::from_bytes`].
///
/// Implemented by the body deserializer for its target type; encodings
/// hand it an erased deserializer over the response bytes.
pub trait DeserializeSink {
    fn fill(
        &mut self,
        deserializer: &mut dyn erased_serde::Deserializer<'_>,
    ) -> Result<(), erased_serde::Error>;
}

/// Sink that decodes into an owned value of a known type.
pub(crate) struct Slot<T>(pub(crate) Option<T>);

impl<T: serde::de::DeserializeOwned> DeserializeSink for Slot<T> {
    fn fill(
        &mut self,
        deserializer: &mut dyn erased_serde::Deserializer<'_>,
    ) -> Result<(), erased_serde::Error> {
        self.0 = Some(erased_serde::deserialize(deserializer)?);
        Ok(())
    }
}
