use std::marker::PhantomData;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, EntityTrait, IntoActiveModel,
    Iterable, QueryFilter,
    sea_query::{OnConflict, SimpleExpr},
};
use storefront_security::RequestContext;

use crate::secure::cond::build_scope_condition;
use crate::secure::{
    DBRunner, ScopableEntity, ScopeError, Scoped, SeaOrmRunner, Unscoped, inject_scope, seaorm,
};

const SCOPE_COLUMNS_IMMUTABLE: &str = "scope columns are immutable";

/// Insert one row into a scoped entity.
///
/// The scoping columns of `am` are overwritten from `ctx` before the insert;
/// values supplied by the caller for those columns are never trusted.
///
/// # Errors
/// - `ScopeError::MissingScope` if `ctx` lacks a value for a declared
///   scoping column; nothing is inserted.
/// - `ScopeError::Db` if the database insert fails.
pub async fn secure_insert<E>(
    mut am: E::ActiveModel,
    ctx: &RequestContext,
    runner: &impl DBRunner,
) -> Result<E::Model, ScopeError>
where
    E: ScopableEntity,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    E::Model: IntoActiveModel<E::ActiveModel>,
{
    inject_scope(&mut am, ctx)?;

    match seaorm(runner) {
        SeaOrmRunner::Conn(db) => Ok(am.insert(db).await?),
        SeaOrmRunner::Tx(tx) => Ok(am.insert(tx).await?),
    }
}

/// A scoped single-row `INSERT`, used where a plain insert is not enough
/// (upserts with `ON CONFLICT`).
///
/// ```rust,ignore
/// let on_conflict = SecureOnConflict::<seq::Entity>::columns([
///         seq::Column::TenantId,
///         seq::Column::Prefix,
///         seq::Column::Day,
///     ])
///     .value(seq::Column::LastValue, Expr::col(seq::Column::LastValue).add(1))?;
///
/// SecureInsertOne::scoped(am, &ctx)?
///     .on_conflict(on_conflict)
///     .exec_without_returning(tx)
///     .await?;
/// ```
#[derive(Debug)]
pub struct SecureInsertOne<A, S>
where
    A: ActiveModelTrait,
{
    pub(crate) inner: sea_orm::Insert<A>,
    pub(crate) _state: PhantomData<S>,
}

impl<A> SecureInsertOne<A, Scoped>
where
    A: ActiveModelTrait,
    A::Entity: ScopableEntity,
{
    /// Inject the request scope into `am` and build the insert.
    ///
    /// # Errors
    /// Returns `ScopeError::MissingScope` if `ctx` lacks a declared dimension.
    pub fn scoped(mut am: A, ctx: &RequestContext) -> Result<Self, ScopeError> {
        inject_scope(&mut am, ctx)?;
        Ok(Self {
            inner: <A::Entity as EntityTrait>::insert(am),
            _state: PhantomData,
        })
    }

    /// Set the `ON CONFLICT` clause for upsert semantics.
    #[must_use]
    pub fn on_conflict(mut self, on_conflict: SecureOnConflict<A::Entity>) -> Self {
        self.inner = self.inner.on_conflict(on_conflict.build());
        self
    }

    /// Execute the insert and return the number of affected rows.
    ///
    /// # Errors
    /// Returns `ScopeError::Db` if the database operation fails.
    pub async fn exec_without_returning(self, runner: &impl DBRunner) -> Result<u64, ScopeError>
    where
        A: Send,
        <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    {
        match seaorm(runner) {
            SeaOrmRunner::Conn(db) => Ok(self.inner.exec_without_returning(db).await?),
            SeaOrmRunner::Tx(tx) => Ok(self.inner.exec_without_returning(tx).await?),
        }
    }

    /// Unwrap the inner `SeaORM` `Insert` for advanced use cases.
    #[must_use]
    pub fn into_inner(self) -> sea_orm::Insert<A> {
        self.inner
    }
}

/// Builder for `ON CONFLICT DO UPDATE` that refuses to touch scoping columns.
///
/// An upsert that rewrites `site_id` or `tenant_id` would move a row out of
/// the scope it was created in.
#[derive(Debug, Clone)]
pub struct SecureOnConflict<E: EntityTrait> {
    inner: OnConflict,
    _entity: PhantomData<E>,
}

impl<E> SecureOnConflict<E>
where
    E: ScopableEntity,
{
    /// Start building an `ON CONFLICT` clause with the specified conflict columns.
    #[must_use]
    pub fn columns<I>(cols: I) -> Self
    where
        I: IntoIterator<Item = E::Column>,
    {
        Self {
            inner: OnConflict::columns(cols),
            _entity: PhantomData,
        }
    }

    /// Overwrite `cols` with the incoming values on conflict.
    ///
    /// # Errors
    /// Returns `ScopeError::Denied` if one of `cols` is a scoping column.
    pub fn update_columns<I>(mut self, cols: I) -> Result<Self, ScopeError>
    where
        I: IntoIterator<Item = E::Column>,
    {
        let cols: Vec<E::Column> = cols.into_iter().collect();
        if cols.iter().any(|c| E::is_scope_col(*c)) {
            return Err(ScopeError::Denied(SCOPE_COLUMNS_IMMUTABLE));
        }
        self.inner.update_columns(cols);
        Ok(self)
    }

    /// Set a custom update expression for a column on conflict.
    ///
    /// # Errors
    /// Returns `ScopeError::Denied` if `col` is a scoping column.
    pub fn value(mut self, col: E::Column, expr: SimpleExpr) -> Result<Self, ScopeError> {
        if E::is_scope_col(col) {
            return Err(ScopeError::Denied(SCOPE_COLUMNS_IMMUTABLE));
        }
        self.inner.value(col, expr);
        Ok(self)
    }

    #[must_use]
    pub fn build(self) -> OnConflict {
        self.inner
    }
}

/// A type-safe wrapper around `SeaORM`'s `UpdateMany` that enforces scoping.
///
/// Writing a scoping column through `col_expr` or `set` is recorded and makes
/// `exec` fail with `ScopeError::Denied`.
///
/// # Example
/// ```rust,ignore
/// let res = product::Entity::update_many()
///     .col_expr(product::Column::Name, Expr::value("Green tea"))
///     .secure()
///     .scope_with(&ctx)
///     .and_id(id)?
///     .exec(&conn)
///     .await?;
/// ```
#[derive(Clone, Debug)]
pub struct SecureUpdateMany<E: EntityTrait, S> {
    pub(crate) inner: sea_orm::UpdateMany<E>,
    pub(crate) _state: PhantomData<S>,
    pub(crate) scope_update_attempted: bool,
}

// Fluent builder methods (available in all typestates).
impl<E, S> SecureUpdateMany<E, S>
where
    E: ScopableEntity,
{
    /// Set a column expression (mirrors `SeaORM`'s `UpdateMany::col_expr`).
    #[must_use]
    pub fn col_expr(mut self, col: E::Column, expr: SimpleExpr) -> Self {
        if E::is_scope_col(col) {
            self.scope_update_attempted = true;
        }
        self.inner = self.inner.col_expr(col, expr);
        self
    }

    /// Set every column that is `Set` in `am`.
    #[must_use]
    pub fn set<A>(mut self, am: A) -> Self
    where
        A: ActiveModelTrait<Entity = E>,
    {
        let touches_scope = <E::Column as Iterable>::iter()
            .any(|c| E::is_scope_col(c) && !am.is_not_set(c));
        if touches_scope {
            self.scope_update_attempted = true;
        }
        self.inner = self.inner.set(am);
        self
    }

    /// Add an additional filter. Scope conditions remain in place once applied.
    #[must_use]
    pub fn filter(mut self, filter: Condition) -> Self {
        self.inner = QueryFilter::filter(self.inner, filter);
        self
    }
}

/// Extension trait to convert a regular `SeaORM` `UpdateMany` into a `SecureUpdateMany`.
pub trait SecureUpdateExt<E: EntityTrait>: Sized {
    /// Convert this update operation into a secure (unscoped) update.
    /// You must call `.scope_with()` before executing.
    fn secure(self) -> SecureUpdateMany<E, Unscoped>;
}

impl<E> SecureUpdateExt<E> for sea_orm::UpdateMany<E>
where
    E: EntityTrait,
{
    fn secure(self) -> SecureUpdateMany<E, Unscoped> {
        SecureUpdateMany {
            inner: self,
            _state: PhantomData,
            scope_update_attempted: false,
        }
    }
}

impl<E> SecureUpdateMany<E, Unscoped>
where
    E: ScopableEntity,
{
    /// Apply the request scope, transitioning to the `Scoped` state.
    #[must_use]
    pub fn scope_with(self, ctx: &RequestContext) -> SecureUpdateMany<E, Scoped> {
        let inner = match build_scope_condition::<E, _>(ctx, std::iter::empty()) {
            Some(cond) => QueryFilter::filter(self.inner, cond),
            None => self.inner,
        };
        SecureUpdateMany {
            inner,
            _state: PhantomData,
            scope_update_attempted: self.scope_update_attempted,
        }
    }
}

impl<E> SecureUpdateMany<E, Scoped>
where
    E: ScopableEntity,
{
    /// Narrow the update to a single resource id.
    ///
    /// # Errors
    /// Returns `ScopeError::Invalid` if the entity doesn't have a resource column.
    pub fn and_id(self, id: uuid::Uuid) -> Result<Self, ScopeError> {
        let resource_col = E::resource_col().ok_or(ScopeError::Invalid(
            "Entity must have a resource_col to use and_id()",
        ))?;
        Ok(self.filter(Condition::all().add(resource_col.eq(id))))
    }

    /// Execute the update operation.
    ///
    /// # Errors
    /// - `ScopeError::Denied` if a scoping column was written.
    /// - `ScopeError::Db` if the database operation fails.
    pub async fn exec(self, runner: &impl DBRunner) -> Result<sea_orm::UpdateResult, ScopeError> {
        if self.scope_update_attempted {
            return Err(ScopeError::Denied(SCOPE_COLUMNS_IMMUTABLE));
        }
        match seaorm(runner) {
            SeaOrmRunner::Conn(db) => Ok(self.inner.exec(db).await?),
            SeaOrmRunner::Tx(tx) => Ok(self.inner.exec(tx).await?),
        }
    }

    /// Unwrap the inner `SeaORM` `UpdateMany` for advanced use cases.
    ///
    /// The caller must not strip the conditions applied by `.scope_with()`.
    #[must_use]
    pub fn into_inner(self) -> sea_orm::UpdateMany<E> {
        self.inner
    }
}

/// A type-safe wrapper around `SeaORM`'s `DeleteMany` that enforces scoping.
///
/// # Example
/// ```rust,ignore
/// let res = sku::Entity::delete_many()
///     .filter(sku::Column::Id.is_in(ids))
///     .secure()
///     .scope_with(&ctx)
///     .exec(tx)
///     .await?;
/// ```
#[derive(Clone, Debug)]
pub struct SecureDeleteMany<E: EntityTrait, S> {
    pub(crate) inner: sea_orm::DeleteMany<E>,
    pub(crate) _state: PhantomData<S>,
}

/// Extension trait to convert a regular `SeaORM` `DeleteMany` into a `SecureDeleteMany`.
pub trait SecureDeleteExt<E: EntityTrait>: Sized {
    /// Convert this delete operation into a secure (unscoped) delete.
    /// You must call `.scope_with()` before executing.
    fn secure(self) -> SecureDeleteMany<E, Unscoped>;
}

impl<E> SecureDeleteExt<E> for sea_orm::DeleteMany<E>
where
    E: EntityTrait,
{
    fn secure(self) -> SecureDeleteMany<E, Unscoped> {
        SecureDeleteMany {
            inner: self,
            _state: PhantomData,
        }
    }
}

impl<E> SecureDeleteMany<E, Unscoped>
where
    E: ScopableEntity,
{
    /// Apply the request scope, transitioning to the `Scoped` state.
    #[must_use]
    pub fn scope_with(self, ctx: &RequestContext) -> SecureDeleteMany<E, Scoped> {
        let inner = match build_scope_condition::<E, _>(ctx, std::iter::empty()) {
            Some(cond) => QueryFilter::filter(self.inner, cond),
            None => self.inner,
        };
        SecureDeleteMany {
            inner,
            _state: PhantomData,
        }
    }
}

impl<E> SecureDeleteMany<E, Scoped>
where
    E: ScopableEntity,
{
    /// Add additional filters to the scoped delete.
    /// The scope conditions remain in place.
    #[must_use]
    pub fn filter(mut self, filter: Condition) -> Self {
        self.inner = QueryFilter::filter(self.inner, filter);
        self
    }

    /// Narrow the delete to a single resource id.
    ///
    /// # Errors
    /// Returns `ScopeError::Invalid` if the entity doesn't have a resource column.
    pub fn and_id(self, id: uuid::Uuid) -> Result<Self, ScopeError> {
        let resource_col = E::resource_col().ok_or(ScopeError::Invalid(
            "Entity must have a resource_col to use and_id()",
        ))?;
        Ok(self.filter(Condition::all().add(resource_col.eq(id))))
    }

    /// Execute the delete operation.
    ///
    /// # Errors
    /// Returns `ScopeError::Db` if the database operation fails.
    pub async fn exec(self, runner: &impl DBRunner) -> Result<sea_orm::DeleteResult, ScopeError> {
        match seaorm(runner) {
            SeaOrmRunner::Conn(db) => Ok(self.inner.exec(db).await?),
            SeaOrmRunner::Tx(tx) => Ok(self.inner.exec(tx).await?),
        }
    }

    /// Unwrap the inner `SeaORM` `DeleteMany` for advanced use cases.
    ///
    /// The caller must not strip the conditions applied by `.scope_with()`.
    #[must_use]
    pub fn into_inner(self) -> sea_orm::DeleteMany<E> {
        self.inner
    }
}
