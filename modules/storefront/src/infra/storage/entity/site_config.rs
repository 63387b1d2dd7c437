use sea_orm::Set;
use sea_orm::entity::prelude::*;
use storefront_db::crud::CrudEntity;
use storefront_db::secure::Scopable;

use super::set_opt;
use crate::domain::model::{NewSiteConfig, SiteConfigPatch};

/// Key/value settings of one site. `(site_id, key)` is unique.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Scopable)]
#[sea_orm(table_name = "site_config")]
#[secure(no_tenant, site_col = "site_id", no_dept, resource_col = "id")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub site_id: Uuid,
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub created_at: TimeDateTimeWithTimeZone,
    pub updated_at: TimeDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl CrudEntity for Entity {
    const NAME: &'static str = "site-config";
    type Create = NewSiteConfig;
    type Patch = SiteConfigPatch;

    fn search_col() -> Option<Column> {
        Some(Column::Key)
    }

    fn created_at_col() -> Option<Column> {
        Some(Column::CreatedAt)
    }

    fn updated_at_col() -> Option<Column> {
        Some(Column::UpdatedAt)
    }

    fn new_active_model(input: NewSiteConfig) -> ActiveModel {
        ActiveModel {
            key: Set(input.key),
            value: Set(input.value),
            description: Set(input.description),
            ..Default::default()
        }
    }

    fn patch_active_model(patch: SiteConfigPatch) -> ActiveModel {
        ActiveModel {
            key: set_opt(patch.key),
            value: set_opt(patch.value),
            description: set_opt(patch.description),
            ..Default::default()
        }
    }
}
