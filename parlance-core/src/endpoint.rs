//! Endpoint descriptors.

use std::collections::BTreeMap;

use http::Method;

use crate::{Error, UrlBuilder};

/// A statically known method descriptor.
///
/// Generated code typically defines one endpoint value per service method,
/// created once and shared by every call. Implementations must be pure:
/// rendering the same parameters always appends the same path.
pub trait Endpoint: Send + Sync {
    /// Append this endpoint's path to `url`, substituting template
    /// variables from `params`.
    ///
    /// Fails with [`Error::Precondition`] when a template variable has no
    /// value in `params`.
    fn render_path(&self, params: &BTreeMap<String, String>, url: &mut UrlBuilder)
        -> Result<(), Error>;

    /// The HTTP method used for this endpoint.
    fn http_method(&self) -> Method;
}
