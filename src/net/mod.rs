//! Networking: the REST client and its wire schema.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` moves bytes, `api` turns them into envelopes and errors, the
//! per-resource modules (`auth`, `tasks`, `classes`, `notifications`,
//! `admin`) add typed endpoint methods to [`ApiClient`], and `types` defines
//! the shared DTOs.

pub mod admin;
pub mod api;
pub mod auth;
pub mod classes;
pub mod error;
pub mod notifications;
pub mod tasks;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ApiClient, QueryParams};
pub use error::ApiError;
pub use transport::{ApiRequest, ApiTransport, HttpTransport, Method, RawResponse, TransportError};
