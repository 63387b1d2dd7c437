use sea_orm::Set;
use sea_orm::entity::prelude::*;
use storefront_db::crud::CrudEntity;
use storefront_db::secure::Scopable;

use super::set_opt;
use crate::domain::model::{INQUIRY_STATUS_OPEN, InquiryPatch, NewInquiry};

/// Admin-side inquiry, isolated by tenant and department.
///
/// `inquiry_no` is allocated per tenant and day, see
/// [`next_sequence`](crate::domain::service::sequence::next_sequence).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Scopable)]
#[sea_orm(table_name = "inquiry")]
#[secure(tenant_col = "tenant_id", no_site, dept_col = "dept_id", resource_col = "id")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub dept_id: Uuid,
    pub inquiry_no: String,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub exporter_id: Option<Uuid>,
    pub created_by: Uuid,
    pub created_at: TimeDateTimeWithTimeZone,
    pub updated_at: TimeDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl CrudEntity for Entity {
    const NAME: &'static str = "inquiry";
    type Create = NewInquiry;
    type Patch = InquiryPatch;

    fn search_col() -> Option<Column> {
        Some(Column::Subject)
    }

    fn created_at_col() -> Option<Column> {
        Some(Column::CreatedAt)
    }

    fn updated_at_col() -> Option<Column> {
        Some(Column::UpdatedAt)
    }

    fn new_active_model(input: NewInquiry) -> ActiveModel {
        ActiveModel {
            subject: Set(input.subject),
            message: Set(input.message),
            status: Set(INQUIRY_STATUS_OPEN.to_owned()),
            ..Default::default()
        }
    }

    fn patch_active_model(patch: InquiryPatch) -> ActiveModel {
        ActiveModel {
            subject: set_opt(patch.subject),
            message: set_opt(patch.message),
            status: set_opt(patch.status),
            ..Default::default()
        }
    }
}
