use sea_orm::{ColumnTrait, Condition, EntityTrait, Order};
use storefront_db::crud::{CrudOps, CrudService, PageLimits};
use storefront_db::secure::{Db, RequestContext, SecureEntityExt};
use time::OffsetDateTime;
use tracing::{debug, instrument};

use crate::domain::error::DomainError;
use crate::infra::storage::entity::ad::{self, Column, Entity as AdEntity};

pub struct AdsService {
    crud: CrudService<AdEntity, DomainError>,
}

impl AdsService {
    #[must_use]
    pub fn new(db: Db, limits: PageLimits) -> Self {
        Self {
            crud: CrudService::new(db, CrudOps::generated(), limits),
        }
    }

    #[must_use]
    pub fn crud(&self) -> &CrudService<AdEntity, DomainError> {
        &self.crud
    }

    /// Ads of the caller's site that are switched on and whose display window
    /// contains the current time, by `sort_order`.
    ///
    /// # Errors
    /// Returns a database error if the query fails.
    #[instrument(skip_all)]
    pub async fn active(&self, ctx: &RequestContext) -> Result<Vec<ad::Model>, DomainError> {
        let conn = self.crud.db().conn()?;
        let ads = AdEntity::find()
            .secure()
            .scope_with(ctx)
            .filter(active_at(OffsetDateTime::now_utc()))
            .order_by(Column::SortOrder, Order::Asc)
            .order_by(Column::CreatedAt, Order::Desc)
            .all(&conn)
            .await?;
        debug!(count = ads.len(), "active ads");
        Ok(ads)
    }
}

/// `is_active AND starts_at <= now <= ends_at`, with a missing bound open.
fn active_at(now: OffsetDateTime) -> Condition {
    Condition::all()
        .add(Column::IsActive.eq(true))
        .add(
            Condition::any()
                .add(Column::StartsAt.is_null())
                .add(Column::StartsAt.lte(now)),
        )
        .add(
            Condition::any()
                .add(Column::EndsAt.is_null())
                .add(Column::EndsAt.gte(now)),
        )
}
