#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! # storefront-db-macros
//!
//! Procedural macros for the `storefront-db` secure ORM layer.
//!
//! ## `#[derive(Scopable)]`
//!
//! Implements `ScopableEntity` for a `SeaORM` entity from `#[secure(...)]` attributes.
//! Every dimension needs an explicit decision; nothing is inferred from column names.
//!
//! ```ignore
//! use sea_orm::entity::prelude::*;
//! use storefront_db::secure::Scopable;
//!
//! #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Scopable)]
//! #[sea_orm(table_name = "products")]
//! #[secure(no_tenant, site_col = "site_id", no_dept, resource_col = "id")]
//! pub struct Model {
//!     #[sea_orm(primary_key, auto_increment = false)]
//!     pub id: Uuid,
//!     pub site_id: Uuid,
//!     pub name: String,
//! }
//! ```
//!
//! ### Attributes
//!
//! - **Tenant**: `tenant_col = "column"` OR `no_tenant`
//! - **Site**: `site_col = "column"` OR `no_site`
//! - **Department**: `dept_col = "column"` OR `no_dept`
//! - **Resource**: `resource_col = "column"` OR `no_resource`
//! - **Unrestricted**: `unrestricted` (forbids all other attributes)

use proc_macro::TokenStream;
use proc_macro_error2::proc_macro_error;
use syn::{DeriveInput, parse_macro_input};

mod scopable;

/// Derive macro for implementing `ScopableEntity`.
///
/// Place it on the `SeaORM` `Model` struct next to `#[secure(...)]`. The generated
/// impl targets the sibling `Entity` type produced by `DeriveEntityModel`.
///
/// # Global Entities
///
/// ```ignore
/// #[derive(DeriveEntityModel, Scopable)]
/// #[sea_orm(table_name = "currencies")]
/// #[secure(unrestricted)]
/// pub struct Model {
///     #[sea_orm(primary_key)]
///     pub code: String,
/// }
/// ```
#[proc_macro_derive(Scopable, attributes(secure))]
#[proc_macro_error]
pub fn derive_scopable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    scopable::expand_derive_scopable(input).into()
}
