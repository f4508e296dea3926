//! Codecs for the scalar values carried in paths, headers, and query
//! parameters.

use std::collections::BTreeSet;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use uuid::Uuid;

use parlance_core::Error;

use crate::types::{ResourceIdentifier, SafeLong};

/// Encodes and decodes the atomic values of plain request parameters.
///
/// Every `serialize_*` function is total on its declared domain and every
/// `deserialize_*` function inverts it, failing with
/// [`Error::InvalidArgument`] on values outside the domain. Absent
/// optional parameters are omitted from the request entirely — stubs apply
/// these codecs inside `Option::map` rather than encoding an absence
/// marker. Collection parameters are encoded element-wise; sets iterate in
/// their deterministic sorted order.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainSerDe;

impl PlainSerDe {
    pub fn serialize_string(&self, value: &str) -> String {
        value.to_string()
    }

    pub fn serialize_integer(&self, value: i32) -> String {
        value.to_string()
    }

    pub fn serialize_safe_long(&self, value: SafeLong) -> String {
        value.to_string()
    }

    /// Shortest decimal form that round-trips. Non-finite values have no
    /// wire form and are rejected.
    pub fn serialize_double(&self, value: f64) -> Result<String, Error> {
        if value.is_finite() {
            Ok(value.to_string())
        } else {
            Err(Error::invalid_argument(format!(
                "Cannot serialize non-finite double {value}"
            )))
        }
    }

    pub fn serialize_boolean(&self, value: bool) -> String {
        value.to_string()
    }

    /// ISO-8601 extended form, normalized to UTC (`Z`).
    pub fn serialize_date_time(&self, value: &DateTime<FixedOffset>) -> String {
        value
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    /// Canonical lowercase 8-4-4-4-12 form.
    pub fn serialize_uuid(&self, value: &Uuid) -> String {
        value.to_string()
    }

    pub fn serialize_rid(&self, value: &ResourceIdentifier) -> String {
        value.to_string()
    }

    pub fn serialize_binary(&self, value: &[u8]) -> String {
        BASE64.encode(value)
    }

    pub fn serialize_string_list<'a>(
        &self,
        values: impl IntoIterator<Item = &'a str>,
    ) -> Vec<String> {
        values.into_iter().map(|v| self.serialize_string(v)).collect()
    }

    pub fn serialize_integer_list(&self, values: impl IntoIterator<Item = i32>) -> Vec<String> {
        values
            .into_iter()
            .map(|v| self.serialize_integer(v))
            .collect()
    }

    pub fn serialize_rid_list<'a>(
        &self,
        values: impl IntoIterator<Item = &'a ResourceIdentifier>,
    ) -> Vec<String> {
        values.into_iter().map(|v| self.serialize_rid(v)).collect()
    }

    /// Sets serialize in their sorted iteration order.
    pub fn serialize_uuid_set(&self, values: &BTreeSet<Uuid>) -> Vec<String> {
        values.iter().map(|v| self.serialize_uuid(v)).collect()
    }

    pub fn deserialize_string(&self, raw: &str) -> Result<String, Error> {
        Ok(raw.to_string())
    }

    pub fn deserialize_integer(&self, raw: &str) -> Result<i32, Error> {
        raw.parse()
            .map_err(|e| Error::invalid_argument(format!("Invalid integer value {raw:?}: {e}")))
    }

    pub fn deserialize_safe_long(&self, raw: &str) -> Result<SafeLong, Error> {
        raw.parse()
    }

    pub fn deserialize_double(&self, raw: &str) -> Result<f64, Error> {
        raw.parse()
            .map_err(|e| Error::invalid_argument(format!("Invalid double value {raw:?}: {e}")))
    }

    pub fn deserialize_boolean(&self, raw: &str) -> Result<bool, Error> {
        match raw {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(Error::invalid_argument(format!(
                "Invalid boolean value {raw:?}"
            ))),
        }
    }

    /// Accepts any offset; the decoded value preserves it.
    pub fn deserialize_date_time(&self, raw: &str) -> Result<DateTime<FixedOffset>, Error> {
        DateTime::parse_from_rfc3339(raw)
            .map_err(|e| Error::invalid_argument(format!("Invalid date-time value {raw:?}: {e}")))
    }

    pub fn deserialize_uuid(&self, raw: &str) -> Result<Uuid, Error> {
        Uuid::parse_str(raw)
            .map_err(|e| Error::invalid_argument(format!("Invalid UUID value {raw:?}: {e}")))
    }

    pub fn deserialize_rid(&self, raw: &str) -> Result<ResourceIdentifier, Error> {
        ResourceIdentifier::new(raw)
    }

    pub fn deserialize_binary(&self, raw: &str) -> Result<Vec<u8>, Error> {
        BASE64
            .decode(raw)
            .map_err(|e| Error::invalid_argument(format!("Invalid base64 value {raw:?}: {e}")))
    }
}
