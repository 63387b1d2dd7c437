use sea_orm::Set;
use sea_orm::entity::prelude::*;
use storefront_db::crud::CrudEntity;
use storefront_db::secure::Scopable;

use super::set_opt;
use crate::domain::model::{CategoryPatch, NewCategory};

/// Catalog category. `parent_id` points at another category of the same site.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Scopable)]
#[sea_orm(table_name = "master_category")]
#[secure(no_tenant, site_col = "site_id", no_dept, resource_col = "id")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub site_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub sort_order: i32,
    pub created_at: TimeDateTimeWithTimeZone,
    pub updated_at: TimeDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl CrudEntity for Entity {
    const NAME: &'static str = "master-category";
    type Create = NewCategory;
    type Patch = CategoryPatch;

    fn search_col() -> Option<Column> {
        Some(Column::Name)
    }

    fn created_at_col() -> Option<Column> {
        Some(Column::CreatedAt)
    }

    fn updated_at_col() -> Option<Column> {
        Some(Column::UpdatedAt)
    }

    fn new_active_model(input: NewCategory) -> ActiveModel {
        ActiveModel {
            parent_id: Set(input.parent_id),
            name: Set(input.name),
            slug: Set(input.slug),
            sort_order: Set(input.sort_order),
            ..Default::default()
        }
    }

    fn patch_active_model(patch: CategoryPatch) -> ActiveModel {
        ActiveModel {
            parent_id: set_opt(patch.parent_id),
            name: set_opt(patch.name),
            slug: set_opt(patch.slug),
            sort_order: set_opt(patch.sort_order),
            ..Default::default()
        }
    }
}
