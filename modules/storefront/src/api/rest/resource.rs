//! Per-entity REST wiring: permission names, response body and service.

use serde::Serialize;
use storefront_db::crud::{CrudEntity, CrudService};

use super::dto::{AdDto, CategoryDto, InquiryDto, ProductDto, SiteConfigDto, SkuDto};
use crate::domain::error::DomainError;
use crate::domain::service::AppServices;
use crate::infra::storage::entity::{ad, inquiry, master_category, product, site_config, sku};

/// Permission names guarding the four CRUD routes of one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions {
    pub view: &'static str,
    pub create: &'static str,
    pub update: &'static str,
    pub delete: &'static str,
}

/// `permissions!("PRODUCTS")` expands to `PRODUCTS_TABLE_VIEW` and friends.
macro_rules! permissions {
    ($resource:literal) => {
        Permissions {
            view: concat!($resource, "_TABLE_VIEW"),
            create: concat!($resource, "_TABLE_CREATE"),
            update: concat!($resource, "_TABLE_UPDATE"),
            delete: concat!($resource, "_TABLE_DELETE"),
        }
    };
}

/// An entity exposed through the generic CRUD handlers.
///
/// Request bodies are the entity's `Create` and `Patch` types, so both must
/// also be `DeserializeOwned` for the routes to be built.
pub trait RestResource: CrudEntity {
    const PERMISSIONS: Permissions;

    /// Response body for one row.
    type Dto: Serialize + From<Self::Model> + Send;

    fn service(app: &AppServices) -> &CrudService<Self, DomainError>;
}

impl RestResource for site_config::Entity {
    const PERMISSIONS: Permissions = permissions!("SITE_CONFIGS");
    type Dto = SiteConfigDto;

    fn service(app: &AppServices) -> &CrudService<Self, DomainError> {
        &app.site_configs
    }
}

impl RestResource for master_category::Entity {
    const PERMISSIONS: Permissions = permissions!("MASTER_CATEGORIES");
    type Dto = CategoryDto;

    fn service(app: &AppServices) -> &CrudService<Self, DomainError> {
        app.categories.crud()
    }
}

impl RestResource for product::Entity {
    const PERMISSIONS: Permissions = permissions!("PRODUCTS");
    type Dto = ProductDto;

    fn service(app: &AppServices) -> &CrudService<Self, DomainError> {
        app.products.crud()
    }
}

impl RestResource for sku::Entity {
    const PERMISSIONS: Permissions = permissions!("SKUS");
    type Dto = SkuDto;

    fn service(app: &AppServices) -> &CrudService<Self, DomainError> {
        app.skus.crud()
    }
}

impl RestResource for ad::Entity {
    const PERMISSIONS: Permissions = permissions!("ADS");
    type Dto = AdDto;

    fn service(app: &AppServices) -> &CrudService<Self, DomainError> {
        app.ads.crud()
    }
}

impl RestResource for inquiry::Entity {
    const PERMISSIONS: Permissions = permissions!("INQUIRIES");
    type Dto = InquiryDto;

    fn service(app: &AppServices) -> &CrudService<Self, DomainError> {
        &app.inquiries
    }
}
