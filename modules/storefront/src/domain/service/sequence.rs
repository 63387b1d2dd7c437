//! Daily document numbers.
//!
//! A counter row per `(tenant, prefix, day)` is upserted with
//! `last_value = last_value + 1` and read back inside the caller's
//! transaction, so two concurrent allocations never share a number.

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, Condition, EntityTrait, Set};
use storefront_db::secure::{
    DbTx, RequestContext, SecureEntityExt, SecureInsertOne, SecureOnConflict,
};
use time::{Date, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::infra::storage::entity::daily_sequence::{self, Column, Entity as SequenceEntity};

/// `YYYYMMDD`
fn day_key(date: Date) -> String {
    format!(
        "{:04}{:02}{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Allocate the next number for `prefix` in the caller's tenant, formatted
/// as `<PREFIX>-<YYYYMMDD>-<NNNN>`. Numbering restarts at 1 every UTC day.
///
/// # Errors
/// - [`DomainError::MissingScope`] when the context has no tenant.
/// - A database error if the upsert or the read-back fails.
pub async fn next_sequence(
    tx: &DbTx<'_>,
    ctx: &RequestContext,
    prefix: &str,
) -> Result<String, DomainError> {
    let now = OffsetDateTime::now_utc();
    let day = day_key(now.date());

    let am = daily_sequence::ActiveModel {
        id: Set(Uuid::now_v7()),
        prefix: Set(prefix.to_owned()),
        day: Set(day.clone()),
        last_value: Set(1),
        updated_at: Set(now),
        ..Default::default()
    };

    let on_conflict =
        SecureOnConflict::<SequenceEntity>::columns([Column::TenantId, Column::Prefix, Column::Day])
            .value(
                Column::LastValue,
                Expr::col((SequenceEntity, Column::LastValue)).add(1),
            )?
            .value(Column::UpdatedAt, Expr::value(now))?;

    SecureInsertOne::scoped(am, ctx)?
        .on_conflict(on_conflict)
        .exec_without_returning(tx)
        .await?;

    let row = SequenceEntity::find()
        .secure()
        .scope_with(ctx)
        .filter(
            Condition::all()
                .add(Column::Prefix.eq(prefix))
                .add(Column::Day.eq(day.as_str())),
        )
        .one(tx)
        .await?
        .ok_or_else(|| DomainError::internal("sequence row missing after upsert"))?;

    debug!(prefix, day = %day, value = row.last_value, "sequence allocated");
    Ok(format!("{prefix}-{day}-{:04}", row.last_value))
}
