use sea_orm::{ActiveModelTrait, ColumnTrait, sea_query::SimpleExpr};
use storefront_security::{RequestContext, ScopeDimension};
use uuid::Uuid;

use crate::secure::{ScopableEntity, ScopeError};

/// One equality predicate tying a scoping column to the request's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeCondition<C> {
    pub dimension: ScopeDimension,
    pub column: C,
    pub value: Uuid,
}

impl<C: ColumnTrait> ScopeCondition<C> {
    /// `column = value`, qualified with the entity's table.
    #[must_use]
    pub fn into_expr(self) -> SimpleExpr {
        ColumnTrait::eq(&self.column, self.value)
    }
}

/// Resolve the equality conditions `ctx` imposes on entity `E`.
///
/// One condition per scoping column that `E` declares **and** `ctx` carries a
/// value for, always in tenant, site, dept order. A declared column without a
/// context value is omitted, never widened to a wildcard; callers that must
/// reject such requests use [`require_scope`]. Unrestricted entities resolve to
/// nothing.
#[must_use]
pub fn resolve_scope<E: ScopableEntity>(ctx: &RequestContext) -> Vec<ScopeCondition<E::Column>> {
    if E::IS_UNRESTRICTED {
        return Vec::new();
    }

    ScopeDimension::ALL
        .into_iter()
        .filter_map(|dimension| {
            let column = E::scope_col(dimension)?;
            let value = ctx.scope_value(dimension)?;
            Some(ScopeCondition {
                dimension,
                column,
                value,
            })
        })
        .collect()
}

/// First dimension `E` declares that `ctx` has no value for.
#[must_use]
pub fn missing_scope<E: ScopableEntity>(ctx: &RequestContext) -> Option<ScopeDimension> {
    if E::IS_UNRESTRICTED {
        return None;
    }
    ScopeDimension::ALL
        .into_iter()
        .find(|dim| E::scope_col(*dim).is_some() && ctx.scope_value(*dim).is_none())
}

/// Require a context value for every scoping column `E` declares.
///
/// # Errors
/// Returns [`ScopeError::MissingScope`] naming the first missing dimension.
pub fn require_scope<E: ScopableEntity>(ctx: &RequestContext) -> Result<(), ScopeError> {
    match missing_scope::<E>(ctx) {
        Some(dimension) => Err(ScopeError::MissingScope { dimension }),
        None => Ok(()),
    }
}

/// Overwrite the scoping columns of `am` with the values from `ctx`.
///
/// Whatever the caller put into those columns is discarded; the context wins.
/// Nothing is written to `am` when a value is missing.
///
/// # Errors
/// Returns [`ScopeError::MissingScope`] when a declared dimension has no value in `ctx`.
pub fn inject_scope<A>(am: &mut A, ctx: &RequestContext) -> Result<(), ScopeError>
where
    A: ActiveModelTrait,
    A::Entity: ScopableEntity,
{
    require_scope::<A::Entity>(ctx)?;
    for cond in resolve_scope::<A::Entity>(ctx) {
        am.set(cond.column, cond.value.into());
    }
    Ok(())
}
