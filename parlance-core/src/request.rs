//! Request values at the runtime boundary.
//!
//! A [`Request`] describes a single RPC exchange from the stub's point of
//! view: pre-encoded path, header, and query atoms plus an optional body.
//! Requests are immutable once built and cheap to hand to a retrying
//! channel, which may replay them.

use std::collections::BTreeMap;

use bytes::Bytes;

/// An immutable description of a single RPC request.
///
/// All keys and values are pre-encoded strings produced by the plain
/// codec. Header and query parameters are multimaps preserving insertion
/// order and multiplicity; header names are kept exactly as given by the
/// caller.
#[derive(Debug, Clone, Default)]
pub struct Request {
    path_params: BTreeMap<String, String>,
    header_params: Vec<(String, String)>,
    query_params: Vec<(String, String)>,
    body: Option<RequestBody>,
}

impl Request {
    pub fn builder() -> RequestBuilder {
        RequestBuilder::default()
    }

    /// Values for the variable segments of the endpoint's path template.
    pub fn path_params(&self) -> &BTreeMap<String, String> {
        &self.path_params
    }

    /// Header parameters in insertion order.
    pub fn header_params(&self) -> &[(String, String)] {
        &self.header_params
    }

    /// Query parameters in insertion order; repeated keys are repeated
    /// entries.
    pub fn query_params(&self) -> &[(String, String)] {
        &self.query_params
    }

    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }
}

/// Builder for [`Request`].
#[derive(Debug, Default)]
pub struct RequestBuilder {
    path_params: BTreeMap<String, String>,
    header_params: Vec<(String, String)>,
    query_params: Vec<(String, String)>,
    body: Option<RequestBody>,
}

impl RequestBuilder {
    /// Set the value for one path template variable.
    pub fn put_path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    /// Append one header parameter. Names are sent on the wire as given.
    pub fn put_header_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.header_params.push((name.into(), value.into()));
        self
    }

    /// Append one query parameter.
    pub fn put_query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push((name.into(), value.into()));
        self
    }

    /// Append one query parameter per value, repeating the key.
    pub fn put_all_query_params(
        mut self,
        name: &str,
        values: impl IntoIterator<Item = String>,
    ) -> Self {
        for value in values {
            self.query_params.push((name.to_string(), value));
        }
        self
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn build(self) -> Request {
        Request {
            path_params: self.path_params,
            header_params: self.header_params,
            query_params: self.query_params,
            body: self.body,
        }
    }
}

/// A content-typed, replayable request body.
///
/// The content is buffered, so a retrying channel can replay it any number
/// of times and the declared length always matches the bytes produced.
#[derive(Debug, Clone)]
pub struct RequestBody {
    content: Bytes,
    content_type: String,
}

impl RequestBody {
    pub fn new(content: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            content_type: content_type.into(),
        }
    }

    /// A zero-length body carrying only a content type.
    pub fn empty(content_type: impl Into<String>) -> Self {
        Self::new(Bytes::new(), content_type)
    }

    /// The body bytes. Cheap to call repeatedly.
    pub fn content(&self) -> Bytes {
        self.content.clone()
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// The exact byte count of [`content`](Self::content).
    pub fn length(&self) -> Option<u64> {
        Some(self.content.len() as u64)
    }
}
