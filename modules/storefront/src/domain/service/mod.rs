//! Domain services.
//!
//! Every entity is served by a [`CrudService`] built from the generated
//! operation table. Entities with extra business queries wrap it in their
//! own service (`categories`, `products`, `skus`, `ads`); the operations they
//! replace are listed in [`CrudOps::overrides`](storefront_db::crud::CrudOps::overrides).
//!
//! | Entity           | Scope         | Overrides |
//! |------------------|---------------|-----------|
//! | site config      | site          | none |
//! | master category  | site          | create and update check the parent is visible, delete refuses categories with children |
//! | product          | site          | none |
//! | sku              | site          | create checks the product is visible |
//! | ad               | site          | none |
//! | inquiry          | tenant + dept | create allocates a number, delete reports not-found |
//!
//! Services only read the [`RequestContext`](storefront_db::secure::RequestContext)
//! they are handed; database errors are returned unchanged as
//! [`DomainError`](crate::domain::error::DomainError).

use storefront_db::crud::{CrudOps, CrudService};
use storefront_db::secure::Db;

use crate::config::StorefrontConfig;
use crate::domain::error::DomainError;
use crate::infra::storage::entity::{inquiry, site_config};

mod ads;
mod categories;
mod inquiries;
mod products;
mod refs;
pub mod sequence;
mod skus;

pub use ads::AdsService;
pub use categories::CategoriesService;
pub use inquiries::{INQUIRY_PREFIX, inquiry_ops};
pub use products::ProductsService;
pub use skus::SkusService;


/// All storefront services, built once at startup and shared by handlers.
pub struct AppServices {
    pub site_configs: CrudService<site_config::Entity, DomainError>,
    pub categories: CategoriesService,
    pub products: ProductsService,
    pub skus: SkusService,
    pub ads: AdsService,
    pub inquiries: CrudService<inquiry::Entity, DomainError>,
}

impl AppServices {
    #[must_use]
    pub fn new(db: &Db, config: &StorefrontConfig) -> Self {
        let limits = config.page_limits();
        Self {
            site_configs: CrudService::new(db.clone(), CrudOps::generated(), limits),
            categories: CategoriesService::new(db.clone(), limits),
            products: ProductsService::new(db.clone(), limits),
            skus: SkusService::new(db.clone(), limits),
            ads: AdsService::new(db.clone(), limits),
            inquiries: CrudService::new(db.clone(), inquiry_ops(), limits),
        }
    }
}
