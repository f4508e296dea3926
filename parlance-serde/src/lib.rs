//! Codec plane for parlance RPC clients.
//!
//! This crate sits between generated stubs and the channel seam defined in
//! `parlance-core`:
//!
//! - [`PlainSerDe`]: codecs for the scalar values carried in paths,
//!   headers, and query parameters
//! - [`Encoding`] and [`JsonEncoding`]: content-type-tagged body codecs
//! - [`BodySerDe`]: the content-negotiating façade over an ordered list of
//!   encodings
//! - [`ErrorDecoder`] and [`ErrorDecodingChannel`]: interpretation of
//!   non-success responses as structured [`RemoteError`]s
//! - [`Runtime`]: the frozen bundle generated stubs are constructed with
//!
//! [`RemoteError`]: parlance_core::RemoteError

mod body;
mod encoding;
mod errors;
mod json;
mod plain;
mod runtime;
mod types;

pub use body::{BodySerDe, Deserializer, EmptyBodyDeserializer, Serializer};
pub use encoding::{DeserializeSink, Encoding};
pub use errors::{ErrorDecoder, ErrorDecodingChannel, SerializableError};
pub use json::JsonEncoding;
pub use plain::PlainSerDe;
pub use runtime::{Runtime, RuntimeBuilder};
pub use types::{ResourceIdentifier, SafeLong};
