#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Per-request identity and scope values shared by every storefront service.
//!
//! The [`RequestContext`] is built once per inbound request by the HTTP layer and
//! passed by reference into services. It is never mutated after construction.

pub mod context;
pub mod scope;

pub use context::{PERMISSION_WILDCARD, RequestContext, RequestContextBuilder};
pub use scope::ScopeDimension;
