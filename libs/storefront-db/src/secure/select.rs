use std::marker::PhantomData;

use sea_orm::{
    ColumnTrait, Condition, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, sea_query::SimpleExpr,
};
use storefront_security::RequestContext;

use crate::secure::cond::build_scope_condition;
use crate::secure::{DBRunner, ScopableEntity, ScopeError, SeaOrmRunner, seaorm};

/// Typestate marker: query has not yet been scoped.
/// Cannot execute queries in this state.
#[derive(Debug, Clone, Copy)]
pub struct Unscoped;

/// Typestate marker: the request scope has been applied.
#[derive(Debug, Clone, Copy)]
pub struct Scoped;

/// A type-safe wrapper around `SeaORM`'s `Select` that enforces scoping.
///
/// Execution methods exist only on `SecureSelect<E, Scoped>`, which can only
/// be obtained through [`SecureSelect::scope_with`]. Builder methods on the
/// scoped query add conditions with `AND`; they never remove the scope.
///
/// # Example
/// ```rust,ignore
/// use storefront_db::secure::SecureEntityExt;
///
/// let ads = ad::Entity::find()
///     .secure()           // SecureSelect<E, Unscoped>
///     .scope_with(&ctx)   // SecureSelect<E, Scoped>
///     .filter(Condition::all().add(ad::Column::IsActive.eq(true)))
///     .order_by(ad::Column::SortOrder, Order::Asc)
///     .all(&conn)
///     .await?;
/// ```
#[must_use]
#[derive(Clone, Debug)]
pub struct SecureSelect<E: EntityTrait, S> {
    pub(crate) inner: sea_orm::Select<E>,
    pub(crate) _state: PhantomData<S>,
}

/// Extension trait to convert a regular `SeaORM` `Select` into a `SecureSelect`.
pub trait SecureEntityExt<E: EntityTrait>: Sized {
    /// Convert this select query into a secure (unscoped) select.
    /// You must call `.scope_with()` before executing the query.
    fn secure(self) -> SecureSelect<E, Unscoped>;
}

impl<E> SecureEntityExt<E> for sea_orm::Select<E>
where
    E: EntityTrait,
{
    fn secure(self) -> SecureSelect<E, Unscoped> {
        SecureSelect {
            inner: self,
            _state: PhantomData,
        }
    }
}

impl<E> SecureSelect<E, Unscoped>
where
    E: ScopableEntity,
{
    /// Apply the request scope, transitioning to the `Scoped` state.
    pub fn scope_with(self, ctx: &RequestContext) -> SecureSelect<E, Scoped> {
        self.scope_with_extra(ctx, std::iter::empty())
    }

    /// Apply the request scope together with extra predicates in one
    /// conjunctive `WHERE`.
    pub fn scope_with_extra<I>(self, ctx: &RequestContext, extra: I) -> SecureSelect<E, Scoped>
    where
        I: IntoIterator<Item = SimpleExpr>,
    {
        let inner = match build_scope_condition::<E, _>(ctx, extra) {
            Some(cond) => QueryFilter::filter(self.inner, cond),
            None => self.inner,
        };
        SecureSelect {
            inner,
            _state: PhantomData,
        }
    }
}

// Execution methods require the Scoped state
impl<E> SecureSelect<E, Scoped>
where
    E: EntityTrait,
{
    /// Execute the query and return all matching rows.
    ///
    /// # Errors
    /// Returns `ScopeError::Db` if the database query fails.
    pub async fn all(self, runner: &impl DBRunner) -> Result<Vec<E::Model>, ScopeError> {
        match seaorm(runner) {
            SeaOrmRunner::Conn(db) => Ok(self.inner.all(db).await?),
            SeaOrmRunner::Tx(tx) => Ok(self.inner.all(tx).await?),
        }
    }

    /// Execute the query and return at most one row.
    ///
    /// # Errors
    /// Returns `ScopeError::Db` if the database query fails.
    pub async fn one(self, runner: &impl DBRunner) -> Result<Option<E::Model>, ScopeError> {
        match seaorm(runner) {
            SeaOrmRunner::Conn(db) => Ok(self.inner.one(db).await?),
            SeaOrmRunner::Tx(tx) => Ok(self.inner.one(tx).await?),
        }
    }

    /// Count the rows matching the scoped query.
    ///
    /// # Errors
    /// Returns `ScopeError::Db` if the database query fails.
    pub async fn count(self, runner: &impl DBRunner) -> Result<u64, ScopeError>
    where
        E::Model: FromQueryResult + Send + Sync,
    {
        match seaorm(runner) {
            SeaOrmRunner::Conn(db) => Ok(PaginatorTrait::count(self.inner, db).await?),
            SeaOrmRunner::Tx(tx) => Ok(PaginatorTrait::count(self.inner, tx).await?),
        }
    }

    /// Narrow the scoped query to a single resource id.
    ///
    /// # Errors
    /// Returns `ScopeError::Invalid` if the entity doesn't have a resource column.
    pub fn and_id(self, id: uuid::Uuid) -> Result<Self, ScopeError>
    where
        E: ScopableEntity,
    {
        let resource_col = E::resource_col().ok_or(ScopeError::Invalid(
            "Entity must have a resource_col to use and_id()",
        ))?;
        Ok(self.filter(Condition::all().add(resource_col.eq(id))))
    }

    /// Add additional filters to the scoped query.
    /// The scope conditions remain in place.
    pub fn filter(mut self, filter: Condition) -> Self {
        self.inner = QueryFilter::filter(self.inner, filter);
        self
    }

    pub fn order_by<C>(mut self, col: C, order: sea_orm::Order) -> Self
    where
        C: sea_orm::IntoSimpleExpr,
    {
        self.inner = QueryOrder::order_by(self.inner, col, order);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.inner = QuerySelect::limit(self.inner, limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.inner = QuerySelect::offset(self.inner, offset);
        self
    }

    /// Also apply the request scope of a joined entity `J`.
    pub fn and_scope_for<J>(mut self, ctx: &RequestContext) -> Self
    where
        J: ScopableEntity,
    {
        if let Some(cond) = build_scope_condition::<J, _>(ctx, std::iter::empty()) {
            self.inner = QueryFilter::filter(self.inner, cond);
        }
        self
    }

    /// Unwrap the inner `SeaORM` `Select` for advanced use cases.
    ///
    /// The caller must not strip the conditions applied by `.scope_with()`.
    #[must_use]
    pub fn into_inner(self) -> sea_orm::Select<E> {
        self.inner
    }
}
