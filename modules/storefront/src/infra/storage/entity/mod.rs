//! `SeaORM` entities.
//!
//! Every table except the sequence counter is served by a generated CRUD
//! service; their [`CrudEntity`](storefront_db::crud::CrudEntity) impls live
//! next to the models.

use sea_orm::{ActiveValue, NotSet, Set, Value};

pub mod ad;
pub mod daily_sequence;
pub mod inquiry;
pub mod master_category;
pub mod product;
pub mod site_config;
pub mod sku;

/// `Set` when present, `NotSet` otherwise.
pub(crate) fn set_opt<V: Into<Value>>(v: Option<V>) -> ActiveValue<V> {
    v.map_or(NotSet, Set)
}
