#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Scoped builders and transactions against SQLite.

mod common;

use common::{note, setup, site_ctx};
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveValue, EntityTrait};
use storefront_db::DbError;
use storefront_db::secure::{
    ScopeError, SecureDeleteExt, SecureEntityExt, SecureUpdateExt, secure_insert,
};
use time::OffsetDateTime;
use uuid::Uuid;

fn draft(title: &str) -> note::ActiveModel {
    let now = OffsetDateTime::now_utc();
    note::ActiveModel {
        id: ActiveValue::Set(Uuid::now_v7()),
        title: ActiveValue::Set(title.to_owned()),
        body: ActiveValue::Set(String::new()),
        created_at: ActiveValue::Set(now),
        updated_at: ActiveValue::Set(now),
        ..Default::default()
    }
}

#[tokio::test]
async fn scoped_update_touches_only_own_site() {
    let db = setup("secure_update_scope").await;
    let s1 = site_ctx(Uuid::new_v4());
    let s2 = site_ctx(Uuid::new_v4());
    let conn = db.conn().unwrap();

    secure_insert::<note::Entity>(draft("a"), &s1, &conn).await.unwrap();
    secure_insert::<note::Entity>(draft("b"), &s2, &conn).await.unwrap();

    let res = note::Entity::update_many()
        .secure()
        .col_expr(note::Column::Body, Expr::value("touched"))
        .scope_with(&s1)
        .exec(&conn)
        .await
        .unwrap();
    assert_eq!(res.rows_affected, 1);

    let other = note::Entity::find()
        .secure()
        .scope_with(&s2)
        .one(&conn)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(other.body, "");
}

#[tokio::test]
async fn writing_a_scope_column_is_denied() {
    let db = setup("secure_update_denied").await;
    let ctx = site_ctx(Uuid::new_v4());
    let conn = db.conn().unwrap();
    secure_insert::<note::Entity>(draft("a"), &ctx, &conn).await.unwrap();

    let err = note::Entity::update_many()
        .secure()
        .col_expr(note::Column::SiteId, Expr::value(Uuid::new_v4()))
        .scope_with(&ctx)
        .exec(&conn)
        .await
        .unwrap_err();
    assert!(matches!(err, ScopeError::Denied(_)));

    assert_eq!(note::Entity::find().secure().scope_with(&ctx).count(&conn).await.unwrap(), 1);
}

#[tokio::test]
async fn scoped_delete_spares_other_sites() {
    let db = setup("secure_delete_scope").await;
    let s1 = site_ctx(Uuid::new_v4());
    let s2 = site_ctx(Uuid::new_v4());
    let conn = db.conn().unwrap();

    let theirs = secure_insert::<note::Entity>(draft("b"), &s2, &conn).await.unwrap();

    let res = note::Entity::delete_many()
        .secure()
        .scope_with(&s1)
        .and_id(theirs.id)
        .unwrap()
        .exec(&conn)
        .await
        .unwrap();
    assert_eq!(res.rows_affected, 0);
    assert_eq!(note::Entity::find().secure().scope_with(&s2).count(&conn).await.unwrap(), 1);
}

#[tokio::test]
async fn transaction_commit_persists_changes() {
    let db = setup("secure_tx_commit").await;
    let ctx = site_ctx(Uuid::new_v4());
    let tx_ctx = ctx.clone();

    let id = db
        .transaction(move |tx| {
            Box::pin(async move {
                let row = secure_insert::<note::Entity>(draft("committed"), &tx_ctx, tx).await?;
                Ok::<Uuid, ScopeError>(row.id)
            })
        })
        .await
        .expect("Transaction failed");

    let conn = db.conn().unwrap();
    let found = note::Entity::find()
        .secure()
        .scope_with(&ctx)
        .and_id(id)
        .unwrap()
        .one(&conn)
        .await
        .unwrap()
        .expect("row must exist");
    assert_eq!(found.title, "committed");
}

#[tokio::test]
async fn transaction_error_rolls_back() {
    let db = setup("secure_tx_rollback").await;
    let ctx = site_ctx(Uuid::new_v4());
    let tx_ctx = ctx.clone();

    let res: Result<(), ScopeError> = db
        .transaction(move |tx| {
            Box::pin(async move {
                secure_insert::<note::Entity>(draft("should_rollback"), &tx_ctx, tx).await?;
                Err(ScopeError::Denied("simulated failure"))
            })
        })
        .await;
    assert!(res.is_err());

    let conn = db.conn().unwrap();
    let count = note::Entity::find()
        .secure()
        .scope_with(&ctx)
        .count(&conn)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn conn_inside_transaction_is_refused() {
    let db = setup("secure_tx_guard").await;
    let inner = db.clone();

    let res: Result<(), ScopeError> = db
        .transaction(move |_tx| {
            Box::pin(async move {
                let err = inner.conn().err().expect("conn() should fail inside transaction");
                assert!(
                    matches!(err, DbError::ConnRequestedInsideTx),
                    "Expected ConnRequestedInsideTx, got: {err:?}"
                );
                Ok(())
            })
        })
        .await;
    res.expect("Transaction body should complete");

    assert!(db.conn().is_ok(), "conn() should succeed outside transaction");
}
