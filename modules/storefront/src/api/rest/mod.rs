//! HTTP surface of the storefront module.
//!
//! One resource group per entity under `/<entity-name>`, each behind the
//! scope guard and per-route permission checks. Errors leave as RFC 9457
//! problem documents.

pub mod context;
pub mod dto;
pub mod error;
pub mod guard;
mod handlers;
pub mod problem;
pub mod resource;
pub mod routes;


pub use problem::{ApiResult, Problem};
