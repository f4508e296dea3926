//! The runtime façade consumed by generated stubs.

use std::sync::Arc;

use crate::body::{BodySerDe, EmptyBodyDeserializer};
use crate::encoding::Encoding;
use crate::json::JsonEncoding;
use crate::plain::PlainSerDe;

/// The frozen bundle of codecs generated stubs are constructed with.
///
/// Built once per client and shared by every call; cloning is cheap. The
/// default runtime registers the JSON encoding only.
///
/// ```
/// use parlance_serde::Runtime;
///
/// let runtime = Runtime::default();
/// let serializer = runtime.body_serde().serializer::<String>();
/// let body = serializer.serialize(&"hello".to_string()).unwrap();
/// assert_eq!(body.content_type(), "application/json");
/// ```
#[derive(Debug, Clone)]
pub struct Runtime {
    body_serde: BodySerDe,
    plain_serde: PlainSerDe,
}

impl Runtime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::default()
    }

    pub fn body_serde(&self) -> &BodySerDe {
        &self.body_serde
    }

    pub fn plain_serde(&self) -> &PlainSerDe {
        &self.plain_serde
    }

    /// Shorthand for `body_serde().empty_body_deserializer()`.
    pub fn empty_body_deserializer(&self) -> EmptyBodyDeserializer {
        self.body_serde.empty_body_deserializer()
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`Runtime`].
///
/// Encodings are registered in preference order; the first registered
/// encoding becomes the serialization default.
#[derive(Debug, Default)]
pub struct RuntimeBuilder {
    encodings: Vec<Arc<dyn Encoding>>,
}

impl RuntimeBuilder {
    /// Register an encoding. When no encoding is registered, the built
    /// runtime falls back to [`JsonEncoding`].
    pub fn encoding(mut self, encoding: impl Encoding + 'static) -> Self {
        self.encodings.push(Arc::new(encoding));
        self
    }

    pub fn build(self) -> Runtime {
        let encodings = if self.encodings.is_empty() {
            vec![Arc::new(JsonEncoding) as Arc<dyn Encoding>]
        } else {
            self.encodings
        };
        Runtime {
            body_serde: BodySerDe::new(encodings),
            plain_serde: PlainSerDe,
        }
    }
}
