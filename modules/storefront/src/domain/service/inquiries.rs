use futures::future::BoxFuture;
use sea_orm::{EntityTrait, Set};
use storefront_db::crud::{CrudEntity, CrudOps};
use storefront_db::secure::{Db, RequestContext, SecureDeleteExt, require_scope, secure_insert};
use time::OffsetDateTime;
use uuid::Uuid;

use super::sequence::next_sequence;
use crate::domain::error::DomainError;
use crate::domain::model::NewInquiry;
use crate::infra::storage::entity::inquiry::{self, Entity as InquiryEntity};

/// Prefix of inquiry numbers, e.g. `INQ-20250601-0001`.
pub const INQUIRY_PREFIX: &str = "INQ";

/// Inquiry operations: generated list and update, numbered create, and a
/// delete that reports not-found.
#[must_use]
pub fn inquiry_ops() -> CrudOps<InquiryEntity, DomainError> {
    CrudOps::generated()
        .override_create(create_inquiry)
        .override_delete(delete_inquiry)
}

fn create_inquiry<'a>(
    db: &'a Db,
    ctx: &'a RequestContext,
    input: NewInquiry,
) -> BoxFuture<'a, Result<inquiry::Model, DomainError>> {
    Box::pin(async move {
        require_scope::<InquiryEntity>(ctx)?;

        let ctx = ctx.clone();
        db.transaction(move |tx| {
            Box::pin(async move {
                let inquiry_no = next_sequence(tx, &ctx, INQUIRY_PREFIX).await?;
                let now = OffsetDateTime::now_utc();

                let mut am = InquiryEntity::new_active_model(input);
                am.id = Set(Uuid::now_v7());
                am.inquiry_no = Set(inquiry_no);
                am.exporter_id = Set(ctx.exporter_id());
                am.created_by = Set(ctx.user_id());
                am.created_at = Set(now);
                am.updated_at = Set(now);

                let row = secure_insert::<InquiryEntity>(am, &ctx, tx).await?;
                Ok::<_, DomainError>(row)
            })
        })
        .await
    })
}

fn delete_inquiry<'a>(
    db: &'a Db,
    ctx: &'a RequestContext,
    id: Uuid,
) -> BoxFuture<'a, Result<bool, DomainError>> {
    Box::pin(async move {
        let conn = db.conn()?;
        let res = InquiryEntity::delete_many()
            .secure()
            .scope_with(ctx)
            .and_id(id)?
            .exec(&conn)
            .await?;
        if res.rows_affected == 0 {
            return Err(DomainError::not_found(InquiryEntity::NAME, id));
        }
        Ok::<_, DomainError>(true)
    })
}
