//! HTTP request gateway
//!
//! Every call to the hosted backend goes through [`Gateway`], which attaches
//! the API key and bearer headers, serializes JSON bodies and folds error
//! responses into a single [`GatewayError`]. One attempt per call: no
//! retries and no backoff.

pub mod client;
pub mod error;

pub use client::{Gateway, Payload, RequestOptions};
pub use error::GatewayError;
