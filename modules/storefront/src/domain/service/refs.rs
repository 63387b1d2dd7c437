use std::collections::HashSet;

use sea_orm::{ColumnTrait, Condition, FromQueryResult};
use storefront_db::secure::{
    DBRunner, RequestContext, ScopableEntity, SecureEntityExt, require_scope,
};
use uuid::Uuid;

use crate::domain::error::DomainError;

/// Fail on `field` unless every id in `ids` names an `E` row visible in the scope.
///
/// Ids that do not exist and ids owned by another scope give the same error.
pub(crate) async fn ensure_visible<E>(
    runner: &impl DBRunner,
    ctx: &RequestContext,
    field: &'static str,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<(), DomainError>
where
    E: ScopableEntity,
    E::Model: FromQueryResult + Send + Sync,
{
    require_scope::<E>(ctx)?;
    let wanted: HashSet<Uuid> = ids.into_iter().collect();
    if wanted.is_empty() {
        return Ok(());
    }
    let Some(id_col) = E::resource_col() else {
        return Err(DomainError::internal(format!(
            "{field} refers to an entity without an id column"
        )));
    };

    let found = E::find()
        .secure()
        .scope_with(ctx)
        .filter(Condition::all().add(id_col.is_in(wanted.iter().copied())))
        .count(runner)
        .await?;
    if u64::try_from(wanted.len()).ok() == Some(found) {
        return Ok(());
    }
    Err(DomainError::validation(field, "refers to a record that does not exist"))
}
