use sea_orm::{ColumnTrait, Condition, EntityTrait, Order};
use storefront_db::crud::{CrudEntity, CrudOps, CrudService, PageLimits};
use storefront_db::secure::{Db, RequestContext, SecureEntityExt};
use tracing::instrument;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::ProductDetail;
use crate::infra::storage::entity::{product, sku};

pub struct ProductsService {
    crud: CrudService<product::Entity, DomainError>,
}

impl ProductsService {
    #[must_use]
    pub fn new(db: Db, limits: PageLimits) -> Self {
        Self {
            crud: CrudService::new(db, CrudOps::generated(), limits),
        }
    }

    #[must_use]
    pub fn crud(&self) -> &CrudService<product::Entity, DomainError> {
        &self.crud
    }

    /// A product and its SKUs, both narrowed to the caller's scope.
    ///
    /// # Errors
    /// Returns [`DomainError::NotFound`] when the product is missing or
    /// outside the scope.
    #[instrument(skip(self, ctx), fields(product_id = %id))]
    pub async fn detail(&self, ctx: &RequestContext, id: Uuid) -> Result<ProductDetail, DomainError> {
        let conn = self.crud.db().conn()?;

        let product = product::Entity::find()
            .secure()
            .scope_with(ctx)
            .and_id(id)?
            .one(&conn)
            .await?
            .ok_or_else(|| DomainError::not_found(product::Entity::NAME, id))?;

        let skus = sku::Entity::find()
            .secure()
            .scope_with(ctx)
            .filter(Condition::all().add(sku::Column::ProductId.eq(id)))
            .order_by(sku::Column::Code, Order::Asc)
            .all(&conn)
            .await?;

        Ok(ProductDetail { product, skus })
    }
}
