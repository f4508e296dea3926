//! Hyper-backed transport for parlance RPC clients.
//!
//! [`HyperChannel`] is the transport end of the channel chain: it renders
//! an [`Endpoint`](parlance_core::Endpoint) and
//! [`Request`](parlance_core::Request) into an HTTP request, performs the
//! exchange with hyper, and conveys the response as-is — it never retries,
//! never decodes errors, and never follows redirects.
//!
//! [`ClientBuilder`] assembles the full client-facing stack
//! (error-decoding over retrying over transport) the way most callers
//! want it:
//!
//! ```ignore
//! use parlance_hyper::ClientBuilder;
//!
//! let channel = ClientBuilder::new("https://api.example.com")
//!     .max_attempts(3)
//!     .build()?;
//! ```

mod body;
mod builder;
mod channel;
mod connector;

pub use body::TransportBody;
pub use builder::ClientBuilder;
pub use channel::{HyperChannel, HyperChannelBuilder};
pub use connector::{build_https_connector, default_tls_config};
