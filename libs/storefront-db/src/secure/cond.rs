use sea_orm::{Condition, sea_query::SimpleExpr};
use storefront_security::RequestContext;

use crate::secure::{ScopableEntity, resolve_scope};

/// Build `(scope conditions) AND (extra conditions)` for entity `E`.
///
/// Scope conditions always come first and are always present; `extra` can only
/// narrow the result further. Returns `None` when there is nothing to apply, in
/// which case the caller leaves its query untouched.
#[must_use]
pub fn build_scope_condition<E, I>(ctx: &RequestContext, extra: I) -> Option<Condition>
where
    E: ScopableEntity,
    I: IntoIterator<Item = SimpleExpr>,
{
    let mut cond = Condition::all();
    let mut applied = 0usize;

    for scope in resolve_scope::<E>(ctx) {
        cond = cond.add(scope.into_expr());
        applied += 1;
    }
    for expr in extra {
        cond = cond.add(expr);
        applied += 1;
    }

    (applied > 0).then_some(cond)
}
