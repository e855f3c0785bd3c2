//! Resilient REST client for the Lingora study-set service.
//!
//! Every outbound call goes through one pipeline: auth-header injection,
//! content negotiation, and a single transparent token refresh + retry when
//! the server answers 401. See [`ApiClient`].

mod client;
mod endpoints;
mod error;

#[cfg(test)]
mod tests;

pub use client::{ApiClient, Payload};
pub use error::{ApiError, ApiResult};
