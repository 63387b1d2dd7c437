use std::fmt;

use futures::future::BoxFuture;
use sea_orm::sea_query::{LikeExpr, SimpleExpr};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, Order,
};
use storefront_security::{RequestContext, ScopeDimension};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::crud::{CrudEntity, ListParams, Page};
use crate::secure::{
    Db, ScopeError, SecureDeleteExt, SecureEntityExt, SecureUpdateExt, secure_insert,
};

pub type ListFn<E, X> = for<'a> fn(
    &'a Db,
    &'a RequestContext,
    ListParams,
) -> BoxFuture<'a, Result<Page<<E as EntityTrait>::Model>, X>>;

pub type CreateFn<E, X> = for<'a> fn(
    &'a Db,
    &'a RequestContext,
    <E as CrudEntity>::Create,
) -> BoxFuture<'a, Result<<E as EntityTrait>::Model, X>>;

/// `Ok(None)` when no row with that id is visible in the scope.
pub type UpdateFn<E, X> = for<'a> fn(
    &'a Db,
    &'a RequestContext,
    Uuid,
    <E as CrudEntity>::Patch,
) -> BoxFuture<'a, Result<Option<<E as EntityTrait>::Model>, X>>;

/// `Ok(false)` when no row with that id is visible in the scope.
pub type DeleteFn<X> =
    for<'a> fn(&'a Db, &'a RequestContext, Uuid) -> BoxFuture<'a, Result<bool, X>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrudOp {
    List,
    Create,
    Update,
    Delete,
}

impl CrudOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for CrudOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strategy table for one entity: one function per operation.
///
/// Start from [`CrudOps::generated`] and replace single operations with the
/// `override_*` builders. Replaced operations are recorded so they show up in
/// startup logs.
pub struct CrudOps<E: CrudEntity, X> {
    pub(crate) list: ListFn<E, X>,
    pub(crate) create: CreateFn<E, X>,
    pub(crate) update: UpdateFn<E, X>,
    pub(crate) delete: DeleteFn<X>,
    overridden: Vec<CrudOp>,
}

impl<E, X> CrudOps<E, X>
where
    E: CrudEntity,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    X: From<ScopeError> + Send + 'static,
{
    /// The default table: scoped list with search and paging, scoped create,
    /// update and delete by id.
    #[must_use]
    pub fn generated() -> Self {
        Self {
            list: generated_list::<E, X>,
            create: generated_create::<E, X>,
            update: generated_update::<E, X>,
            delete: generated_delete::<E, X>,
            overridden: Vec::new(),
        }
    }
}

impl<E: CrudEntity, X> CrudOps<E, X> {
    #[must_use]
    pub fn override_list(mut self, f: ListFn<E, X>) -> Self {
        self.list = f;
        self.mark(CrudOp::List);
        self
    }

    #[must_use]
    pub fn override_create(mut self, f: CreateFn<E, X>) -> Self {
        self.create = f;
        self.mark(CrudOp::Create);
        self
    }

    #[must_use]
    pub fn override_update(mut self, f: UpdateFn<E, X>) -> Self {
        self.update = f;
        self.mark(CrudOp::Update);
        self
    }

    #[must_use]
    pub fn override_delete(mut self, f: DeleteFn<X>) -> Self {
        self.delete = f;
        self.mark(CrudOp::Delete);
        self
    }

    /// Operations replaced by hand-written functions.
    #[must_use]
    pub fn overrides(&self) -> &[CrudOp] {
        &self.overridden
    }

    fn mark(&mut self, op: CrudOp) {
        if !self.overridden.contains(&op) {
            self.overridden.push(op);
        }
    }
}

fn stamp_now<A: ActiveModelTrait>(am: &mut A, col: Option<<A::Entity as EntityTrait>::Column>) {
    if let Some(col) = col {
        am.set(col, OffsetDateTime::now_utc().into());
    }
}

const LIKE_ESCAPE: char = '\\';

/// `col LIKE '%term%'` with `%`, `_` and the escape character matched literally.
fn contains_literal<C: ColumnTrait>(col: C, term: &str) -> SimpleExpr {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    col.like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
}

fn generated_list<'a, E, X>(
    db: &'a Db,
    ctx: &'a RequestContext,
    params: ListParams,
) -> BoxFuture<'a, Result<Page<E::Model>, X>>
where
    E: CrudEntity,
    E::Model: Sync,
    X: From<ScopeError> + Send + 'static,
{
    Box::pin(async move {
        let conn = db.conn().map_err(ScopeError::from)?;

        let search = params
            .search
            .as_deref()
            .and_then(|term| E::search_col().map(|col| contains_literal(col, term)));
        let base = E::find().secure().scope_with_extra(ctx, search);

        let mut data = base.clone().limit(params.limit).offset(params.offset());
        if let Some(col) = E::created_at_col() {
            data = data.order_by(col, Order::Desc);
        }
        if let Some(col) = E::resource_col() {
            data = data.order_by(col, Order::Desc);
        }

        let (rows, total) = tokio::try_join!(data.all(&conn), base.count(&conn))?;

        Ok::<_, X>(Page {
            data: rows,
            total,
            page: params.page,
            limit: params.limit,
        })
    })
}

/// The default create: scoped insert with a fresh v7 id and both timestamps.
///
/// Overrides that only add checks call this once they pass.
#[must_use]
pub fn generated_create<'a, E, X>(
    db: &'a Db,
    ctx: &'a RequestContext,
    input: E::Create,
) -> BoxFuture<'a, Result<E::Model, X>>
where
    E: CrudEntity,
    E::Model: IntoActiveModel<E::ActiveModel>,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    X: From<ScopeError> + Send + 'static,
{
    Box::pin(async move {
        let mut am = E::new_active_model(input);
        if let Some(col) = E::resource_col()
            && am.is_not_set(col)
        {
            am.set(col, Uuid::now_v7().into());
        }
        stamp_now(&mut am, E::created_at_col());
        stamp_now(&mut am, E::updated_at_col());

        let conn = db.conn().map_err(ScopeError::from)?;
        Ok::<_, X>(secure_insert::<E>(am, ctx, &conn).await?)
    })
}

/// The default update by id; scope, id and `created_at` are never patched.
#[must_use]
pub fn generated_update<'a, E, X>(
    db: &'a Db,
    ctx: &'a RequestContext,
    id: Uuid,
    patch: E::Patch,
) -> BoxFuture<'a, Result<Option<E::Model>, X>>
where
    E: CrudEntity,
    E::ActiveModel: ActiveModelTrait<Entity = E> + Send,
    X: From<ScopeError> + Send + 'static,
{
    Box::pin(async move {
        let mut am = E::patch_active_model(patch);
        // Scope, identity and creation time never change through a patch.
        let frozen = ScopeDimension::ALL
            .into_iter()
            .filter_map(E::scope_col)
            .chain(E::resource_col())
            .chain(E::created_at_col());
        for col in frozen {
            am.not_set(col);
        }

        let conn = db.conn().map_err(ScopeError::from)?;

        // An empty patch still touches the row.
        stamp_now(&mut am, E::updated_at_col());
        if am.is_changed() {
            let res = E::update_many()
                .secure()
                .set(am)
                .scope_with(ctx)
                .and_id(id)?
                .exec(&conn)
                .await?;
            if res.rows_affected == 0 {
                return Ok(None);
            }
        }

        Ok::<_, X>(E::find()
            .secure()
            .scope_with(ctx)
            .and_id(id)?
            .one(&conn)
            .await?)
    })
}

fn generated_delete<'a, E, X>(
    db: &'a Db,
    ctx: &'a RequestContext,
    id: Uuid,
) -> BoxFuture<'a, Result<bool, X>>
where
    E: CrudEntity,
    X: From<ScopeError> + Send + 'static,
{
    Box::pin(async move {
        let conn = db.conn().map_err(ScopeError::from)?;
        let res = E::delete_many()
            .secure()
            .scope_with(ctx)
            .and_id(id)?
            .exec(&conn)
            .await?;
        Ok::<_, X>(res.rows_affected > 0)
    })
}
