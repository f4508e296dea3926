//! Core runtime boundary for parlance RPC clients.
//!
//! This crate defines the contract between generated service stubs, channel
//! decorators, and network transports:
//!
//! - [`Channel`]: the single-operation seam every transport and decorator
//!   implements
//! - [`Endpoint`]: a statically known method descriptor (HTTP method plus
//!   path rendering)
//! - [`Request`] / [`Response`]: immutable per-call values describing one
//!   RPC exchange
//! - [`PathTemplate`] / [`UrlBuilder`]: URL construction with RFC 3986
//!   percent-encoding
//! - [`Error`]: the failure taxonomy surfaced on every call
//! - [`RetryingChannel`]: the retry decorator
//!
//! Codecs (body serialization, plain-parameter serialization, remote error
//! decoding) live in `parlance-serde`; the hyper-backed transport lives in
//! `parlance-hyper`.

mod blocking;
mod channel;
mod endpoint;
mod error;
mod marker;
mod path;
mod request;
mod response;
mod retry;
mod url;

pub use blocking::await_with_deadline;
pub use channel::Channel;
pub use endpoint::Endpoint;
pub use error::{BoxError, Error, RemoteError};
pub use marker::TypeMarker;
pub use path::{PathTemplate, PathTemplateBuilder};
pub use request::{Request, RequestBuilder, RequestBody};
pub use response::{Response, ResponseBody};
pub use retry::RetryingChannel;
pub use url::UrlBuilder;

// Re-export the HTTP method type used by `Endpoint`.
pub use http::Method;
