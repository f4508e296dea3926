//! Scalar value types with validated domains.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use parlance_core::Error;

/// A signed integer restricted to the range exactly representable by an
/// IEEE-754 double: ±(2^53 − 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SafeLong(i64);

impl SafeLong {
    pub const MIN: SafeLong = SafeLong(-((1i64 << 53) - 1));
    pub const MAX: SafeLong = SafeLong((1i64 << 53) - 1);

    /// Validate `value` against the safe range.
    pub fn new(value: i64) -> Result<Self, Error> {
        if (Self::MIN.0..=Self::MAX.0).contains(&value) {
            Ok(SafeLong(value))
        } else {
            Err(Error::invalid_argument(format!(
                "SafeLong value out of range, expected a value between {} and {}, got {value}",
                Self::MIN.0,
                Self::MAX.0
            )))
        }
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SafeLong {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<i64> for SafeLong {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self, Error> {
        SafeLong::new(value)
    }
}

impl FromStr for SafeLong {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Error> {
        let value: i64 = raw
            .parse()
            .map_err(|e| Error::invalid_argument(format!("Invalid SafeLong value {raw:?}: {e}")))?;
        SafeLong::new(value)
    }
}

impl Serialize for SafeLong {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for SafeLong {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i64::deserialize(deserializer)?;
        SafeLong::new(value).map_err(serde::de::Error::custom)
    }
}

/// An opaque structured identifier of the form
/// `ri.<service>.<instance>.<type>.<locator>`.
///
/// The string is validated on construction and carried verbatim
/// afterwards; no transformation is applied when it is rendered into a
/// request.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceIdentifier(String);

impl ResourceIdentifier {
    pub fn new(value: impl Into<String>) -> Result<Self, Error> {
        let value = value.into();
        validate_rid(&value)
            .map_err(|reason| {
                Error::invalid_argument(format!("Invalid resource identifier {value:?}: {reason}"))
            })
            .map(|()| ResourceIdentifier(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The service component, e.g. `files` in `ri.files.main.folder.abc`.
    pub fn service(&self) -> &str {
        self.component(0)
    }

    /// The instance component; may be empty.
    pub fn instance(&self) -> &str {
        self.component(1)
    }

    /// The resource type component.
    pub fn resource_type(&self) -> &str {
        self.component(2)
    }

    /// The locator component.
    pub fn locator(&self) -> &str {
        self.component(3)
    }

    fn component(&self, index: usize) -> &str {
        // Validated at construction, so the split always yields 4 parts.
        self.0
            .strip_prefix("ri.")
            .unwrap_or_default()
            .splitn(4, '.')
            .nth(index)
            .unwrap_or_default()
    }
}

fn validate_rid(value: &str) -> Result<(), &'static str> {
    let rest = value.strip_prefix("ri.").ok_or("missing \"ri.\" prefix")?;
    let mut parts = rest.splitn(4, '.');
    let service = parts.next().unwrap_or_default();
    let instance = parts.next().ok_or("expected 4 dot-separated components")?;
    let resource_type = parts.next().ok_or("expected 4 dot-separated components")?;
    let locator = parts.next().ok_or("expected 4 dot-separated components")?;

    if !is_name(service) {
        return Err("invalid service component");
    }
    if !instance.is_empty() && !is_instance(instance) {
        return Err("invalid instance component");
    }
    if !is_name(resource_type) {
        return Err("invalid type component");
    }
    if locator.is_empty()
        || !locator
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_'))
    {
        return Err("invalid locator component");
    }
    Ok(())
}

/// `[a-z][a-z0-9-]*`
fn is_name(component: &str) -> bool {
    let mut bytes = component.bytes();
    match bytes.next() {
        Some(first) if first.is_ascii_lowercase() => {
            bytes.all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        }
        _ => false,
    }
}

/// `[a-z0-9][a-z0-9-]*`
fn is_instance(component: &str) -> bool {
    let mut bytes = component.bytes();
    match bytes.next() {
        Some(first) if first.is_ascii_lowercase() || first.is_ascii_digit() => {
            bytes.all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        }
        _ => false,
    }
}

impl fmt::Display for ResourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ResourceIdentifier {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Error> {
        ResourceIdentifier::new(raw)
    }
}

impl Serialize for ResourceIdentifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ResourceIdentifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        ResourceIdentifier::new(value).map_err(serde::de::Error::custom)
    }
}
