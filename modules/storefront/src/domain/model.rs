//! Service-level input types.
//!
//! These are the bodies the generated services accept. Scoping columns are
//! absent: the request context supplies them, and anything a
//! client sends under those names is ignored.

use serde::{Deserialize, Deserializer};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::infra::storage::entity::{master_category, product, sku};

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn nullable<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

fn nullable_rfc3339<'de, D>(de: D) -> Result<Option<Option<OffsetDateTime>>, D::Error>
where
    D: Deserializer<'de>,
{
    time::serde::rfc3339::option::deserialize(de).map(Some)
}

// ---- site config ----

#[derive(Debug, Clone, Deserialize)]
pub struct NewSiteConfig {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SiteConfigPatch {
    pub key: Option<String>,
    pub value: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
}

// ---- master category ----

#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CategoryPatch {
    #[serde(deserialize_with = "nullable")]
    pub parent_id: Option<Option<Uuid>>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub sort_order: Option<i32>,
}

/// A category with the visible categories nested under it.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryNode {
    pub category: master_category::Model,
    pub children: Vec<CategoryNode>,
}

/// One entry of a reorder request.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SortOrderUpdate {
    pub id: Uuid,
    pub sort_order: i32,
}

// ---- product ----

#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductPatch {
    pub name: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
}

/// A product together with its SKUs.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetail {
    pub product: product::Model,
    pub skus: Vec<sku::Model>,
}

// ---- sku ----

#[derive(Debug, Clone, Deserialize)]
pub struct NewSku {
    pub product_id: Uuid,
    pub code: String,
    pub price_cents: i64,
    #[serde(default)]
    pub stock: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SkuPatch {
    pub code: Option<String>,
    pub price_cents: Option<i64>,
    pub stock: Option<i32>,
}

// ---- ad ----

#[derive(Debug, Clone, Deserialize)]
pub struct NewAd {
    pub title: String,
    pub image_url: String,
    #[serde(default)]
    pub link_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub starts_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub ends_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub sort_order: i32,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdPatch {
    pub title: Option<String>,
    pub image_url: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub link_url: Option<Option<String>>,
    pub is_active: Option<bool>,
    #[serde(deserialize_with = "nullable_rfc3339")]
    pub starts_at: Option<Option<OffsetDateTime>>,
    #[serde(deserialize_with = "nullable_rfc3339")]
    pub ends_at: Option<Option<OffsetDateTime>>,
    pub sort_order: Option<i32>,
}

// ---- inquiry ----

/// Status given to every new inquiry.
pub const INQUIRY_STATUS_OPEN: &str = "open";

#[derive(Debug, Clone, Deserialize)]
pub struct NewInquiry {
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InquiryPatch {
    pub subject: Option<String>,
    pub message: Option<String>,
    pub status: Option<String>,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn patch_distinguishes_null_from_absent() {
        let p: ProductPatch = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(p.description, Some(None));
        assert!(p.name.is_none());

        let p: ProductPatch = serde_json::from_str(r#"{"name": "Tea"}"#).unwrap();
        assert!(p.description.is_none());
    }

    #[test]
    fn scope_fields_in_body_are_ignored() {
        let body = r#"{"key": "site_name", "value": "Acme", "site_id": "00000000-0000-0000-0000-000000000001"}"#;
        let cfg: NewSiteConfig = serde_json::from_str(body).unwrap();
        assert_eq!(cfg.key, "site_name");
    }

    #[test]
    fn ad_window_parses_rfc3339() {
        let body = r#"{"title": "Sale", "image_url": "/a.png", "ends_at": "2026-01-31T23:59:59Z"}"#;
        let ad: NewAd = serde_json::from_str(body).unwrap();
        assert!(ad.is_active);
        assert!(ad.starts_at.is_none());
        assert_eq!(ad.ends_at.unwrap().year(), 2026);

        let patch: AdPatch = serde_json::from_str(r#"{"ends_at": null}"#).unwrap();
        assert_eq!(patch.ends_at, Some(None));
    }
}
