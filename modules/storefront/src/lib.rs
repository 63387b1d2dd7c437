//! Storefront module
//!
//! Site-scoped catalog and content (site configs, master categories,
//! products, SKUs, ads) and tenant/department-scoped inquiries, each served
//! by a generated CRUD service over the scoped storage layer and exposed
//! over REST.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod config;
pub mod domain;
pub mod infra;
pub mod module;

pub use config::StorefrontConfig;
pub use module::Storefront;

#[cfg(test)]
mod test_support;
