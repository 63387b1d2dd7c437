use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::model::{CategoryNode, ProductDetail};
use crate::infra::storage::entity::{ad, inquiry, master_category, product, site_config, sku};

/// REST DTO for a site config row
#[derive(Debug, Clone, Serialize)]
pub struct SiteConfigDto {
    pub id: Uuid,
    pub site_id: Uuid,
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<site_config::Model> for SiteConfigDto {
    fn from(m: site_config::Model) -> Self {
        Self {
            id: m.id,
            site_id: m.site_id,
            key: m.key,
            value: m.value,
            description: m.description,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// REST DTO for a master category row
#[derive(Debug, Clone, Serialize)]
pub struct CategoryDto {
    pub id: Uuid,
    pub site_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub sort_order: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<master_category::Model> for CategoryDto {
    fn from(m: master_category::Model) -> Self {
        Self {
            id: m.id,
            site_id: m.site_id,
            parent_id: m.parent_id,
            name: m.name,
            slug: m.slug,
            sort_order: m.sort_order,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// A category with its children, as returned by `GET /master-category/tree`
#[derive(Debug, Clone, Serialize)]
pub struct CategoryNodeDto {
    #[serde(flatten)]
    pub category: CategoryDto,
    pub children: Vec<CategoryNodeDto>,
}

impl From<CategoryNode> for CategoryNodeDto {
    fn from(n: CategoryNode) -> Self {
        Self {
            category: n.category.into(),
            children: n.children.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductDto {
    pub id: Uuid,
    pub site_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<product::Model> for ProductDto {
    fn from(m: product::Model) -> Self {
        Self {
            id: m.id,
            site_id: m.site_id,
            name: m.name,
            description: m.description,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductDetailDto {
    #[serde(flatten)]
    pub product: ProductDto,
    pub skus: Vec<SkuDto>,
}

impl From<ProductDetail> for ProductDetailDto {
    fn from(d: ProductDetail) -> Self {
        Self {
            product: d.product.into(),
            skus: d.skus.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SkuDto {
    pub id: Uuid,
    pub site_id: Uuid,
    pub product_id: Uuid,
    pub code: String,
    pub price_cents: i64,
    pub stock: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<sku::Model> for SkuDto {
    fn from(m: sku::Model) -> Self {
        Self {
            id: m.id,
            site_id: m.site_id,
            product_id: m.product_id,
            code: m.code,
            price_cents: m.price_cents,
            stock: m.stock,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AdDto {
    pub id: Uuid,
    pub site_id: Uuid,
    pub title: String,
    pub image_url: String,
    pub link_url: Option<String>,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub starts_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub ends_at: Option<OffsetDateTime>,
    pub sort_order: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<ad::Model> for AdDto {
    fn from(m: ad::Model) -> Self {
        Self {
            id: m.id,
            site_id: m.site_id,
            title: m.title,
            image_url: m.image_url,
            link_url: m.link_url,
            is_active: m.is_active,
            starts_at: m.starts_at,
            ends_at: m.ends_at,
            sort_order: m.sort_order,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InquiryDto {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub dept_id: Uuid,
    pub inquiry_no: String,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub exporter_id: Option<Uuid>,
    pub created_by: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<inquiry::Model> for InquiryDto {
    fn from(m: inquiry::Model) -> Self {
        Self {
            id: m.id,
            tenant_id: m.tenant_id,
            dept_id: m.dept_id,
            inquiry_no: m.inquiry_no,
            subject: m.subject,
            message: m.message,
            status: m.status,
            exporter_id: m.exporter_id,
            created_by: m.created_by,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

// ---- batch bodies ----

/// `{"items": [...]}`
#[derive(Debug, Clone, Deserialize)]
pub struct ItemsRequest<T> {
    pub items: Vec<T>,
}

/// `{"ids": [...]}`
#[derive(Debug, Clone, Deserialize)]
pub struct IdsRequest {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DeletedCountResponse {
    pub deleted: u64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct UpdatedCountResponse {
    pub updated: u64,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn timestamps_render_as_rfc3339() {
        let at = time::macros::datetime!(2025-06-01 08:30:00 UTC);
        let dto = ProductDto {
            id: Uuid::nil(),
            site_id: Uuid::nil(),
            name: "Tea".to_owned(),
            description: None,
            created_at: at,
            updated_at: at,
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["created_at"], "2025-06-01T08:30:00Z");
        assert!(json["description"].is_null());
    }

    #[test]
    fn detail_flattens_product_fields() {
        let at = time::macros::datetime!(2025-06-01 08:30:00 UTC);
        let dto = ProductDetailDto {
            product: ProductDto {
                id: Uuid::nil(),
                site_id: Uuid::nil(),
                name: "Tea".to_owned(),
                description: None,
                created_at: at,
                updated_at: at,
            },
            skus: Vec::new(),
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["name"], "Tea");
        assert_eq!(json["skus"], serde_json::json!([]));
    }
}
