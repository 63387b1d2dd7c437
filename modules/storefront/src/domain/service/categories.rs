use std::collections::{HashMap, HashSet};

use futures::future::BoxFuture;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, Condition, EntityTrait, Order};
use storefront_db::crud::{CrudOps, CrudService, PageLimits, generated_create, generated_update};
use storefront_db::secure::{Db, RequestContext, SecureDeleteExt, SecureEntityExt, SecureUpdateExt};
use time::OffsetDateTime;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::{CategoryNode, CategoryPatch, NewCategory, SortOrderUpdate};
use crate::domain::service::refs::ensure_visible;
use crate::infra::storage::entity::master_category::{self, Column, Entity as CategoryEntity};

/// Master categories: generated CRUD plus tree and reorder.
pub struct CategoriesService {
    crud: CrudService<CategoryEntity, DomainError>,
}

impl CategoriesService {
    #[must_use]
    pub fn new(db: Db, limits: PageLimits) -> Self {
        let ops = CrudOps::generated()
            .override_create(create_category)
            .override_update(update_category)
            .override_delete(delete_category);
        Self {
            crud: CrudService::new(db, ops, limits),
        }
    }

    #[must_use]
    pub fn crud(&self) -> &CrudService<CategoryEntity, DomainError> {
        &self.crud
    }

    /// Every category visible in the scope, nested under its parent and
    /// ordered by `sort_order` then name. Categories whose parent is not
    /// visible are returned as roots.
    ///
    /// # Errors
    /// Returns a database error if the query fails.
    #[instrument(skip_all)]
    pub async fn tree(&self, ctx: &RequestContext) -> Result<Vec<CategoryNode>, DomainError> {
        let conn = self.crud.db().conn()?;
        let rows = CategoryEntity::find()
            .secure()
            .scope_with(ctx)
            .order_by(Column::SortOrder, Order::Asc)
            .order_by(Column::Name, Order::Asc)
            .all(&conn)
            .await?;
        debug!(count = rows.len(), "building category tree");
        Ok(build_tree(rows))
    }

    /// Set `sort_order` for several categories in one transaction.
    ///
    /// Ids outside the scope are skipped. Returns the number of rows updated.
    ///
    /// # Errors
    /// Returns a database error if any update fails; nothing is changed then.
    #[instrument(skip_all, fields(items = items.len()))]
    pub async fn reorder(
        &self,
        ctx: &RequestContext,
        items: Vec<SortOrderUpdate>,
    ) -> Result<u64, DomainError> {
        if items.is_empty() {
            return Ok(0);
        }

        let ctx = ctx.clone();
        let updated = self
            .crud
            .db()
            .transaction(move |tx| {
                Box::pin(async move {
                    let now = OffsetDateTime::now_utc();
                    let mut updated = 0;
                    for item in items {
                        let res = CategoryEntity::update_many()
                            .secure()
                            .col_expr(Column::SortOrder, Expr::value(item.sort_order))
                            .col_expr(Column::UpdatedAt, Expr::value(now))
                            .scope_with(&ctx)
                            .and_id(item.id)?
                            .exec(tx)
                            .await?;
                        updated += res.rows_affected;
                    }
                    Ok::<_, DomainError>(updated)
                })
            })
            .await?;

        info!(updated, "categories reordered");
        Ok(updated)
    }
}

/// Create override: the parent, if any, must be visible in the scope.
fn create_category<'a>(
    db: &'a Db,
    ctx: &'a RequestContext,
    input: NewCategory,
) -> BoxFuture<'a, Result<master_category::Model, DomainError>> {
    Box::pin(async move {
        let conn = db.conn()?;
        ensure_visible::<CategoryEntity>(&conn, ctx, "parent_id", input.parent_id).await?;
        generated_create::<CategoryEntity, DomainError>(db, ctx, input).await
    })
}

/// Update override: a new parent must be visible and must not be the category itself.
fn update_category<'a>(
    db: &'a Db,
    ctx: &'a RequestContext,
    id: Uuid,
    patch: CategoryPatch,
) -> BoxFuture<'a, Result<Option<master_category::Model>, DomainError>> {
    Box::pin(async move {
        if let Some(Some(parent)) = patch.parent_id {
            if parent == id {
                return Err(DomainError::validation(
                    "parent_id",
                    "a category cannot be its own parent",
                ));
            }
            let conn = db.conn()?;
            ensure_visible::<CategoryEntity>(&conn, ctx, "parent_id", [parent]).await?;
        }
        generated_update::<CategoryEntity, DomainError>(db, ctx, id, patch).await
    })
}

/// Delete override: a category that still has children cannot be removed.
fn delete_category<'a>(
    db: &'a Db,
    ctx: &'a RequestContext,
    id: Uuid,
) -> BoxFuture<'a, Result<bool, DomainError>> {
    Box::pin(async move {
        let conn = db.conn()?;

        let children = CategoryEntity::find()
            .secure()
            .scope_with(ctx)
            .filter(Condition::all().add(Column::ParentId.eq(id)))
            .count(&conn)
            .await?;
        if children > 0 {
            return Err(DomainError::conflict(format!(
                "category {id} still has {children} child categories"
            )));
        }

        let res = CategoryEntity::delete_many()
            .secure()
            .scope_with(ctx)
            .and_id(id)?
            .exec(&conn)
            .await?;
        Ok::<_, DomainError>(res.rows_affected > 0)
    })
}

/// Nest `rows` (already in display order) under their parents.
fn build_tree(rows: Vec<master_category::Model>) -> Vec<CategoryNode> {
    let visible: HashSet<Uuid> = rows.iter().map(|c| c.id).collect();

    let mut children: HashMap<Uuid, Vec<master_category::Model>> = HashMap::new();
    let mut roots = Vec::new();
    for row in rows {
        match row
            .parent_id
            .filter(|p| *p != row.id && visible.contains(p))
        {
            Some(parent) => children.entry(parent).or_default().push(row),
            None => roots.push(row),
        }
    }

    let mut tree: Vec<CategoryNode> = roots
        .into_iter()
        .map(|root| attach(root, &mut children))
        .collect();

    // Rows caught in a parent cycle are unreachable from any root.
    let mut stranded: Vec<_> = children.into_values().flatten().collect();
    stranded.sort_by(|a, b| (a.sort_order, &a.name).cmp(&(b.sort_order, &b.name)));
    tree.extend(stranded.into_iter().map(|category| CategoryNode {
        category,
        children: Vec::new(),
    }));
    tree
}

fn attach(
    category: master_category::Model,
    children: &mut HashMap<Uuid, Vec<master_category::Model>>,
) -> CategoryNode {
    let direct = children.remove(&category.id).unwrap_or_default();
    CategoryNode {
        children: direct.into_iter().map(|c| attach(c, children)).collect(),
        category,
    }
}
