//! Generated per-entity CRUD services.
//!
//! An entity opts in by implementing [`CrudEntity`]. [`CrudOps::generated`]
//! builds the default list/create/update/delete table for it; individual
//! operations are replaced with `override_*` where an entity needs custom
//! behavior. [`CrudService`] binds the table to a [`Db`](crate::secure::Db).
//!
//! ```rust,ignore
//! let ops = CrudOps::<category::Entity, DomainError>::generated()
//!     .override_delete(delete_category);
//! let svc = CrudService::new(db, ops, PageLimits::default());
//!
//! let page = svc.list(&ctx, ListQuery::default()).await?;
//! ```

mod entity;
mod ops;
mod page;
mod service;

pub use entity::CrudEntity;
pub use ops::{
    CreateFn, CrudOp, CrudOps, DeleteFn, ListFn, UpdateFn, generated_create, generated_update,
};
pub use page::{ListParams, ListQuery, Page, PageLimits};
pub use service::CrudService;
