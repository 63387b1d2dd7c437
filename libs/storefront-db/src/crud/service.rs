use sea_orm::EntityTrait;
use storefront_security::RequestContext;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::crud::{CrudEntity, CrudOps, ListQuery, Page, PageLimits};
use crate::secure::Db;

/// CRUD service for one entity: a [`CrudOps`] table bound to the pool.
///
/// Stateless per call. The context is only read; errors from the operations
/// are returned unchanged.
pub struct CrudService<E: CrudEntity, X> {
    db: Db,
    ops: CrudOps<E, X>,
    limits: PageLimits,
}

impl<E, X> CrudService<E, X>
where
    E: CrudEntity,
    X: Send + 'static,
{
    #[must_use]
    pub fn new(db: Db, ops: CrudOps<E, X>, limits: PageLimits) -> Self {
        let overrides: Vec<&str> = ops.overrides().iter().map(|op| op.as_str()).collect();
        debug!(entity = E::NAME, ?overrides, "crud service ready");
        Self { db, ops, limits }
    }

    /// Scoped, searchable, paged listing.
    ///
    /// # Errors
    /// Propagates the list operation's error.
    #[instrument(skip_all, fields(entity = E::NAME))]
    pub async fn list(
        &self,
        ctx: &RequestContext,
        query: ListQuery,
    ) -> Result<Page<<E as EntityTrait>::Model>, X> {
        let params = query.normalize(self.limits);
        debug!(page = params.page, limit = params.limit, search = ?params.search, "list");
        (self.ops.list)(&self.db, ctx, params).await
    }

    /// Insert a row into the caller's scope.
    ///
    /// # Errors
    /// Propagates the create operation's error, including a missing scope value.
    #[instrument(skip_all, fields(entity = E::NAME))]
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: E::Create,
    ) -> Result<<E as EntityTrait>::Model, X> {
        let row = (self.ops.create)(&self.db, ctx, input).await?;
        info!("row created");
        Ok(row)
    }

    /// Patch a row visible in the caller's scope.
    ///
    /// Returns `Ok(None)` both for ids that do not exist and for ids outside the scope.
    ///
    /// # Errors
    /// Propagates the update operation's error.
    #[instrument(skip_all, fields(entity = E::NAME, id = %id))]
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        patch: E::Patch,
    ) -> Result<Option<<E as EntityTrait>::Model>, X> {
        let row = (self.ops.update)(&self.db, ctx, id, patch).await?;
        debug!(found = row.is_some(), "update");
        Ok(row)
    }

    /// Delete a row visible in the caller's scope.
    ///
    /// # Errors
    /// Propagates the delete operation's error.
    #[instrument(skip_all, fields(entity = E::NAME, id = %id))]
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<bool, X> {
        let deleted = (self.ops.delete)(&self.db, ctx, id).await?;
        info!(deleted, "delete");
        Ok(deleted)
    }

    #[must_use]
    pub fn db(&self) -> &Db {
        &self.db
    }

    #[must_use]
    pub fn limits(&self) -> PageLimits {
        self.limits
    }
}
