use futures::future::BoxFuture;
use sea_orm::{ColumnTrait, Condition, EntityTrait, Set};
use storefront_db::crud::{CrudEntity, CrudOps, CrudService, PageLimits, generated_create};
use storefront_db::secure::{
    Db, RequestContext, SecureDeleteExt, require_scope, secure_insert,
};
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::NewSku;
use crate::domain::service::refs::ensure_visible;
use crate::infra::storage::entity::product::Entity as ProductEntity;
use crate::infra::storage::entity::sku::{self, Entity as SkuEntity};

pub struct SkusService {
    crud: CrudService<SkuEntity, DomainError>,
}

impl SkusService {
    #[must_use]
    pub fn new(db: Db, limits: PageLimits) -> Self {
        Self {
            crud: CrudService::new(
                db,
                CrudOps::generated().override_create(create_sku),
                limits,
            ),
        }
    }

    #[must_use]
    pub fn crud(&self) -> &CrudService<SkuEntity, DomainError> {
        &self.crud
    }

    /// Insert several SKUs in one transaction; either all are created or none.
    ///
    /// # Errors
    /// - [`DomainError::Validation`] for an empty batch.
    /// - [`DomainError::MissingScope`] when the context has no site.
    /// - [`DomainError::Validation`] when a `product_id` is not visible on the site.
    /// - [`DomainError::Conflict`] when a code is already taken on the site.
    #[instrument(skip_all, fields(items = items.len()))]
    pub async fn create_batch(
        &self,
        ctx: &RequestContext,
        items: Vec<NewSku>,
    ) -> Result<Vec<sku::Model>, DomainError> {
        if items.is_empty() {
            return Err(DomainError::validation(
                "items",
                "at least one SKU is required",
            ));
        }
        require_scope::<SkuEntity>(ctx)?;

        let ctx = ctx.clone();
        let created = self
            .crud
            .db()
            .transaction(move |tx| {
                Box::pin(async move {
                    ensure_visible::<ProductEntity>(
                        tx,
                        &ctx,
                        "product_id",
                        items.iter().map(|i| i.product_id),
                    )
                    .await?;

                    let now = OffsetDateTime::now_utc();
                    let mut created = Vec::with_capacity(items.len());
                    for input in items {
                        let mut am = SkuEntity::new_active_model(input);
                        am.id = Set(Uuid::now_v7());
                        am.created_at = Set(now);
                        am.updated_at = Set(now);
                        created.push(secure_insert::<SkuEntity>(am, &ctx, tx).await?);
                    }
                    Ok::<_, DomainError>(created)
                })
            })
            .await?;

        info!(created = created.len(), "sku batch created");
        Ok(created)
    }

    /// Delete the SKUs among `ids` that are visible in the scope.
    ///
    /// Returns the number of rows removed.
    ///
    /// # Errors
    /// Returns a database error if the delete fails.
    #[instrument(skip_all, fields(ids = ids.len()))]
    pub async fn delete_batch(&self, ctx: &RequestContext, ids: Vec<Uuid>) -> Result<u64, DomainError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let conn = self.crud.db().conn()?;
        let res = SkuEntity::delete_many()
            .secure()
            .scope_with(ctx)
            .filter(Condition::all().add(sku::Column::Id.is_in(ids)))
            .exec(&conn)
            .await?;

        info!(deleted = res.rows_affected, "sku batch deleted");
        Ok(res.rows_affected)
    }
}

/// Create override: the product must be visible in the caller's scope.
fn create_sku<'a>(
    db: &'a Db,
    ctx: &'a RequestContext,
    input: NewSku,
) -> BoxFuture<'a, Result<sku::Model, DomainError>> {
    Box::pin(async move {
        let conn = db.conn()?;
        ensure_visible::<ProductEntity>(&conn, ctx, "product_id", [input.product_id]).await?;
        generated_create::<SkuEntity, DomainError>(db, ctx, input).await
    })
}
