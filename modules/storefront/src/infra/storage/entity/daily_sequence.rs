use sea_orm::entity::prelude::*;
use storefront_db::secure::Scopable;

/// Per-tenant counter behind generated document numbers.
///
/// One row per `(tenant_id, prefix, day)`; `day` is `YYYYMMDD`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Scopable)]
#[sea_orm(table_name = "daily_sequence")]
#[secure(tenant_col = "tenant_id", no_site, no_dept, resource_col = "id")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub prefix: String,
    pub day: String,
    pub last_value: i64,
    pub updated_at: TimeDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
