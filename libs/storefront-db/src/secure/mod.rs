//! Scoped ORM layer.
//!
//! Wraps `SeaORM` select, update, delete and insert builders so that a query
//! can only run after it has been narrowed by a [`RequestContext`]. The
//! typestate markers [`Unscoped`] and [`Scoped`] make forgetting the scope a
//! compile error rather than a data leak.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use storefront_db::secure::{Scopable, SecureEntityExt};
//! use sea_orm::entity::prelude::*;
//!
//! #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Scopable)]
//! #[sea_orm(table_name = "product")]
//! #[secure(no_tenant, site_col = "site_id", no_dept, resource_col = "id")]
//! pub struct Model {
//!     #[sea_orm(primary_key, auto_increment = false)]
//!     pub id: Uuid,
//!     pub site_id: Uuid,
//!     pub name: String,
//! }
//!
//! let conn = db.conn()?;
//! let products = Entity::find()
//!     .secure()
//!     .scope_with(&ctx)
//!     .all(&conn)
//!     .await?;
//! ```
//!
//! # Policy
//!
//! | Entity declares | Context carries | Condition |
//! |-----------------|-----------------|-----------|
//! | `site_col`      | `site_id = S`   | `site_id = S` |
//! | `site_col`      | no site         | omitted (rejected upstream by the scope guard) |
//! | `unrestricted`  | anything        | none |
//!
//! Conditions are equality only and always AND-ed, in tenant, site, dept order.

mod cond;
mod db;
mod db_ops;
mod entity_traits;
mod error;
mod resolver;
mod runner;
mod select;

pub use cond::build_scope_condition;
pub use db::{Db, DbConn, DbTx};
pub use db_ops::{
    SecureDeleteExt, SecureDeleteMany, SecureInsertOne, SecureOnConflict, SecureUpdateExt,
    SecureUpdateMany, secure_insert,
};
pub use entity_traits::ScopableEntity;
pub use error::ScopeError;
pub use resolver::{ScopeCondition, inject_scope, missing_scope, require_scope, resolve_scope};
pub use runner::DBRunner;
pub use select::{Scoped, SecureEntityExt, SecureSelect, Unscoped};

pub(crate) use runner::{SeaOrmRunner, seaorm};

pub use storefront_db_macros::Scopable;
pub use storefront_security::{RequestContext, ScopeDimension};
