//! Database access for storefront services.
//!
//! Every read and write of business rows goes through [`secure`]: queries are
//! wrapped in typestate builders that refuse to execute until a
//! [`RequestContext`](storefront_security::RequestContext) has narrowed them to
//! the caller's tenant, site and department. [`crud`] builds the generated
//! per-entity services on top of those builders.

pub mod crud;
mod error;
pub mod migration_runner;
mod options;
pub mod secure;

pub use error::DbError;
pub use options::{ConnectOpts, connect_db};
