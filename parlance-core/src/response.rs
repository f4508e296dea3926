//! Response values at the runtime boundary.

use std::fmt;

use bytes::{Bytes, BytesMut};
use futures::stream::BoxStream;
use futures::StreamExt;

use crate::Error;

/// The response to a single RPC request, as produced by a transport.
///
/// The status code is the transport-layer status, preserved verbatim;
/// `content_type` is the value of the `Content-Type` header if present.
/// Transports never decode the body — interpretation belongs to the
/// deserializer or error decoder that consumes this value.
pub struct Response {
    code: u16,
    content_type: Option<String>,
    body: ResponseBody,
}

impl Response {
    pub fn new(code: u16, content_type: Option<String>, body: ResponseBody) -> Self {
        Self {
            code,
            content_type,
            body,
        }
    }

    /// The HTTP status code.
    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Consume the response, yielding its body. The body is a
    /// single-consumer stream; whoever takes it owns its closure.
    pub fn into_body(self) -> ResponseBody {
        self.body
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("code", &self.code)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// A single-consumer response body.
///
/// Transports that buffer eagerly use [`ResponseBody::full`]; streaming
/// transports hand over a chunk stream. Either way the body is consumed
/// exactly once.
pub enum ResponseBody {
    Full(Bytes),
    Streaming(BoxStream<'static, Result<Bytes, Error>>),
}

impl ResponseBody {
    pub fn empty() -> Self {
        ResponseBody::Full(Bytes::new())
    }

    pub fn full(bytes: impl Into<Bytes>) -> Self {
        ResponseBody::Full(bytes.into())
    }

    pub fn streaming<S>(stream: S) -> Self
    where
        S: futures::Stream<Item = Result<Bytes, Error>> + Send + 'static,
    {
        ResponseBody::Streaming(stream.boxed())
    }

    /// Read the body to completion.
    pub async fn collect(self) -> Result<Bytes, Error> {
        match self {
            ResponseBody::Full(bytes) => Ok(bytes),
            ResponseBody::Streaming(mut stream) => {
                let mut buf = BytesMut::new();
                while let Some(chunk) = stream.next().await {
                    buf.extend_from_slice(&chunk?);
                }
                Ok(buf.freeze())
            }
        }
    }

    /// Read just far enough to learn whether any byte is present.
    pub async fn has_content(self) -> Result<bool, Error> {
        match self {
            ResponseBody::Full(bytes) => Ok(!bytes.is_empty()),
            ResponseBody::Streaming(mut stream) => {
                while let Some(chunk) = stream.next().await {
                    if !chunk?.is_empty() {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseBody::Full(bytes) => f
                .debug_struct("ResponseBody::Full")
                .field("len", &bytes.len())
                .finish(),
            ResponseBody::Streaming(_) => write!(f, "ResponseBody::Streaming"),
        }
    }
}
