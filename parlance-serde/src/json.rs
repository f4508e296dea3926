//! JSON body encoding.

use parlance_core::BoxError;

use crate::encoding::{DeserializeSink, Encoding};

/// The default body encoding: `application/json` via `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoding;

pub(crate) const APPLICATION_JSON: &str = "application/json";

impl Encoding for JsonEncoding {
    fn content_type(&self) -> &str {
        APPLICATION_JSON
    }

    fn supports_content_type(&self, media_type: &str) -> bool {
        media_type.eq_ignore_ascii_case(APPLICATION_JSON)
    }

    fn to_bytes(&self, value: &dyn erased_serde::Serialize) -> Result<Vec<u8>, BoxError> {
        let mut buf = Vec::new();
        let mut serializer = serde_json::Serializer::new(&mut buf);
        erased_serde::serialize(value, &mut serializer)?;
        Ok(buf)
    }

    fn from_bytes(&self, bytes: &[u8], sink: &mut dyn DeserializeSink) -> Result<(), BoxError> {
        let mut deserializer = serde_json::Deserializer::from_slice(bytes);
        {
            let mut erased = <dyn erased_serde::Deserializer>::erase(&mut deserializer);
            sink.fill(&mut erased)?;
        }
        // Trailing garbage after the value is a syntax error too.
        deserializer.end()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::encoding::Slot;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        int_property: i32,
    }

    #[test]
    fn test_round_trip() {
        let bytes = JsonEncoding
            .to_bytes(&Sample { int_property: 42 })
            .unwrap();
        assert_eq!(bytes, br#"{"int_property":42}"#);

        let mut slot = Slot::<Sample>(None);
        JsonEncoding.from_bytes(&bytes, &mut slot).unwrap();
        assert_eq!(slot.0.unwrap(), Sample { int_property: 42 });
    }

    #[test]
    fn test_syntax_error_is_surfaced() {
        let mut slot = Slot::<Sample>(None);
        assert!(JsonEncoding.from_bytes(b"not json", &mut slot).is_err());
    }

    #[test]
    fn test_trailing_garbage_rejected() {
        let mut slot = Slot::<i32>(None);
        assert!(JsonEncoding.from_bytes(b"42 garbage", &mut slot).is_err());
    }

    #[test]
    fn test_supports_own_content_type() {
        assert!(JsonEncoding.supports_content_type(JsonEncoding.content_type()));
        assert!(!JsonEncoding.supports_content_type("text/plain"));
    }
}
