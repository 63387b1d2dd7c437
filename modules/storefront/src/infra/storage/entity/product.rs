use sea_orm::Set;
use sea_orm::entity::prelude::*;
use storefront_db::crud::CrudEntity;
use storefront_db::secure::Scopable;

use super::set_opt;
use crate::domain::model::{NewProduct, ProductPatch};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Scopable)]
#[sea_orm(table_name = "product")]
#[secure(no_tenant, site_col = "site_id", no_dept, resource_col = "id")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub site_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: TimeDateTimeWithTimeZone,
    pub updated_at: TimeDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sku::Entity")]
    Sku,
}

impl Related<super::sku::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sku.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl CrudEntity for Entity {
    const NAME: &'static str = "product";
    type Create = NewProduct;
    type Patch = ProductPatch;

    fn search_col() -> Option<Column> {
        Some(Column::Name)
    }

    fn created_at_col() -> Option<Column> {
        Some(Column::CreatedAt)
    }

    fn updated_at_col() -> Option<Column> {
        Some(Column::UpdatedAt)
    }

    fn new_active_model(input: NewProduct) -> ActiveModel {
        ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            ..Default::default()
        }
    }

    fn patch_active_model(patch: ProductPatch) -> ActiveModel {
        ActiveModel {
            name: set_opt(patch.name),
            description: set_opt(patch.description),
            ..Default::default()
        }
    }
}
