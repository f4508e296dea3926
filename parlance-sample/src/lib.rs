//! Reference client for a sample widget service.
//!
//! This crate is written in the exact shape a stub generator must
//! produce: one endpoint value per method, once-initialized serializers
//! and deserializers obtained from the [`Runtime`](parlance_serde::Runtime),
//! plain parameters encoded with
//! [`PlainSerDe`](parlance_serde::PlainSerDe), and two facets per service
//! — an async client returning futures and a blocking client that awaits
//! them with a deadline.

mod client;
mod objects;

pub use client::{AsyncWidgetServiceClient, WidgetServiceClient};
pub use objects::Widget;
