use sea_orm::Set;
use sea_orm::entity::prelude::*;
use storefront_db::crud::CrudEntity;
use storefront_db::secure::Scopable;

use super::set_opt;
use crate::domain::model::{NewSku, SkuPatch};

/// Sellable variant of a product. Prices are stored in minor units.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Scopable)]
#[sea_orm(table_name = "sku")]
#[secure(no_tenant, site_col = "site_id", no_dept, resource_col = "id")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub site_id: Uuid,
    pub product_id: Uuid,
    pub code: String,
    pub price_cents: i64,
    pub stock: i32,
    pub created_at: TimeDateTimeWithTimeZone,
    pub updated_at: TimeDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl CrudEntity for Entity {
    const NAME: &'static str = "sku";
    type Create = NewSku;
    type Patch = SkuPatch;

    fn search_col() -> Option<Column> {
        Some(Column::Code)
    }

    fn created_at_col() -> Option<Column> {
        Some(Column::CreatedAt)
    }

    fn updated_at_col() -> Option<Column> {
        Some(Column::UpdatedAt)
    }

    fn new_active_model(input: NewSku) -> ActiveModel {
        ActiveModel {
            product_id: Set(input.product_id),
            code: Set(input.code),
            price_cents: Set(input.price_cents),
            stock: Set(input.stock),
            ..Default::default()
        }
    }

    fn patch_active_model(patch: SkuPatch) -> ActiveModel {
        ActiveModel {
            code: set_opt(patch.code),
            price_cents: set_opt(patch.price_cents),
            stock: set_opt(patch.stock),
            ..Default::default()
        }
    }
}
