//! # devicehub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **JSON device API** under `/api/dispositivos`
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map application results into HTTP responses, including the wire
//!   representation of every device kind
//! - Accept cross-origin requests from any origin
//!
//! ## Dependency rule
//! Depends on `devicehub-app` (for port traits and services) and `devicehub-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;
