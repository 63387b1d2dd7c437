use sea_orm::Set;
use sea_orm::entity::prelude::*;
use storefront_db::crud::CrudEntity;
use storefront_db::secure::Scopable;

use super::set_opt;
use crate::domain::model::{AdPatch, NewAd};

/// Banner shown on a site. An open `starts_at` or `ends_at` leaves that end
/// of the display window unbounded.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Scopable)]
#[sea_orm(table_name = "ad")]
#[secure(no_tenant, site_col = "site_id", no_dept, resource_col = "id")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub site_id: Uuid,
    pub title: String,
    pub image_url: String,
    pub link_url: Option<String>,
    pub is_active: bool,
    pub starts_at: Option<TimeDateTimeWithTimeZone>,
    pub ends_at: Option<TimeDateTimeWithTimeZone>,
    pub sort_order: i32,
    pub created_at: TimeDateTimeWithTimeZone,
    pub updated_at: TimeDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl CrudEntity for Entity {
    const NAME: &'static str = "ad";
    type Create = NewAd;
    type Patch = AdPatch;

    fn search_col() -> Option<Column> {
        Some(Column::Title)
    }

    fn created_at_col() -> Option<Column> {
        Some(Column::CreatedAt)
    }

    fn updated_at_col() -> Option<Column> {
        Some(Column::UpdatedAt)
    }

    fn new_active_model(input: NewAd) -> ActiveModel {
        ActiveModel {
            title: Set(input.title),
            image_url: Set(input.image_url),
            link_url: Set(input.link_url),
            is_active: Set(input.is_active),
            starts_at: Set(input.starts_at),
            ends_at: Set(input.ends_at),
            sort_order: Set(input.sort_order),
            ..Default::default()
        }
    }

    fn patch_active_model(patch: AdPatch) -> ActiveModel {
        ActiveModel {
            title: set_opt(patch.title),
            image_url: set_opt(patch.image_url),
            link_url: set_opt(patch.link_url),
            is_active: set_opt(patch.is_active),
            starts_at: set_opt(patch.starts_at),
            ends_at: set_opt(patch.ends_at),
            sort_order: set_opt(patch.sort_order),
            ..Default::default()
        }
    }
}
