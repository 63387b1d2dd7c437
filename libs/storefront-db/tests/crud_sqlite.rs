#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Generated CRUD service against SQLite: scope isolation, paging and overrides.

mod common;

use common::{NewNote, NotePatch, note, setup, site_ctx};
use futures::future::BoxFuture;
use storefront_db::crud::{CrudOp, CrudOps, CrudService, ListQuery, PageLimits};
use storefront_db::secure::{Db, RequestContext, ScopeDimension, ScopeError};
use uuid::Uuid;

type NoteService = CrudService<note::Entity, ScopeError>;

fn service(db: Db) -> NoteService {
    CrudService::new(db, CrudOps::generated(), PageLimits::default())
}

fn search(term: &str, page: u64, limit: u64) -> ListQuery {
    ListQuery {
        page: Some(page),
        limit: Some(limit),
        search: Some(term.to_owned()),
    }
}

#[tokio::test]
async fn rows_are_invisible_outside_their_site() {
    let svc = service(setup("crud_isolation").await);
    let s1 = site_ctx(Uuid::new_v4());
    let s2 = site_ctx(Uuid::new_v4());

    let row = svc
        .create(&s1, NewNote::titled("site_name"))
        .await
        .unwrap();

    let other = svc.list(&s2, ListQuery::default()).await.unwrap();
    assert!(other.data.is_empty());
    assert_eq!(other.total, 0);

    let own = svc.list(&s1, ListQuery::default()).await.unwrap();
    assert_eq!(own.total, 1);
    assert_eq!(own.data, vec![row.clone()]);

    let patch = NotePatch {
        title: Some("hijacked".to_owned()),
        ..Default::default()
    };
    assert!(svc.update(&s2, row.id, patch).await.unwrap().is_none());
    assert!(!svc.delete(&s2, row.id).await.unwrap());

    let still = svc.list(&s1, ListQuery::default()).await.unwrap();
    assert_eq!(still.data[0].title, "site_name");
}

#[tokio::test]
async fn total_is_independent_of_paging() {
    let svc = service(setup("crud_paging").await);
    let ctx = site_ctx(Uuid::new_v4());

    for i in 0..5 {
        svc.create(&ctx, NewNote::titled(&format!("green tea {i}")))
            .await
            .unwrap();
    }
    svc.create(&ctx, NewNote::titled("coffee")).await.unwrap();
    svc.create(&ctx, NewNote::titled("cocoa")).await.unwrap();

    let first = svc.list(&ctx, search("tea", 1, 2)).await.unwrap();
    assert_eq!(first.total, 5);
    assert_eq!(first.data.len(), 2);
    assert_eq!((first.page, first.limit), (1, 2));

    let last = svc.list(&ctx, search("tea", 3, 2)).await.unwrap();
    assert_eq!(last.total, 5);
    assert_eq!(last.data.len(), 1);

    let beyond = svc.list(&ctx, search("tea", 9, 2)).await.unwrap();
    assert_eq!(beyond.total, 5);
    assert!(beyond.data.is_empty());

    let all = svc.list(&ctx, ListQuery::default()).await.unwrap();
    assert_eq!(all.total, 7);
}

#[tokio::test]
async fn search_treats_wildcards_as_text() {
    let svc = service(setup("crud_search_literal").await);
    let ctx = site_ctx(Uuid::new_v4());

    for title in ["site_name", "siteXname", "100% cotton", "1000 cotton", r"C:\tmp"] {
        svc.create(&ctx, NewNote::titled(title)).await.unwrap();
    }

    let hits = svc.list(&ctx, search("site_name", 1, 10)).await.unwrap();
    assert_eq!(hits.total, 1);
    assert_eq!(hits.data[0].title, "site_name");

    let hits = svc.list(&ctx, search("%", 1, 10)).await.unwrap();
    assert_eq!(hits.total, 1);
    assert_eq!(hits.data[0].title, "100% cotton");

    let hits = svc.list(&ctx, search("_", 1, 10)).await.unwrap();
    assert_eq!(hits.total, 1);

    let hits = svc.list(&ctx, search(r"\", 1, 10)).await.unwrap();
    assert_eq!(hits.total, 1);
    assert_eq!(hits.data[0].title, r"C:\tmp");
}

#[tokio::test]
async fn page_far_past_the_end_is_empty() {
    let svc = service(setup("crud_huge_page").await);
    let ctx = site_ctx(Uuid::new_v4());
    svc.create(&ctx, NewNote::titled("only")).await.unwrap();

    for page in [u64::MAX, 1 << 62] {
        let res = svc
            .list(
                &ctx,
                ListQuery {
                    page: Some(page),
                    limit: Some(10),
                    search: None,
                },
            )
            .await
            .unwrap();
        assert!(res.data.is_empty());
        assert_eq!(res.total, 1);
        assert_eq!(res.page, page);
    }
}

#[tokio::test]
async fn list_is_newest_first_and_clamped() {
    let db = setup("crud_order").await;
    let svc = CrudService::<note::Entity, ScopeError>::new(
        db,
        CrudOps::generated(),
        PageLimits {
            default_limit: 2,
            max_limit: 3,
        },
    );
    let ctx = site_ctx(Uuid::new_v4());

    for title in ["first", "second", "third", "fourth"] {
        svc.create(&ctx, NewNote::titled(title)).await.unwrap();
    }

    let page = svc.list(&ctx, ListQuery::default()).await.unwrap();
    assert_eq!(page.limit, 2);
    assert_eq!(page.data[0].title, "fourth");

    let page = svc
        .list(
            &ctx,
            ListQuery {
                limit: Some(50),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.limit, 3);
    assert_eq!(page.data.len(), 3);
}

#[tokio::test]
async fn delete_twice_is_not_an_error() {
    let svc = service(setup("crud_delete_twice").await);
    let ctx = site_ctx(Uuid::new_v4());
    let row = svc.create(&ctx, NewNote::titled("gone")).await.unwrap();

    assert!(svc.delete(&ctx, row.id).await.unwrap());
    assert!(!svc.delete(&ctx, row.id).await.unwrap());
    assert!(!svc.delete(&ctx, Uuid::new_v4()).await.unwrap());
}

#[tokio::test]
async fn partial_update_merges_fields() {
    let svc = service(setup("crud_patch").await);
    let ctx = site_ctx(Uuid::new_v4());
    let row = svc.create(&ctx, NewNote::titled("draft")).await.unwrap();

    let patch = NotePatch {
        title: Some("final".to_owned()),
        ..Default::default()
    };
    let updated = svc.update(&ctx, row.id, patch).await.unwrap().unwrap();

    assert_eq!(updated.title, "final");
    assert_eq!(updated.body, "body of draft");
    assert_eq!(updated.created_at, row.created_at);
    assert!(updated.updated_at >= row.updated_at);

    let listed = svc.list(&ctx, ListQuery::default()).await.unwrap();
    assert_eq!(listed.data, vec![updated]);
}

#[tokio::test]
async fn patch_cannot_move_a_row_to_another_site() {
    let svc = service(setup("crud_patch_scope").await);
    let site = Uuid::new_v4();
    let ctx = site_ctx(site);
    let row = svc.create(&ctx, NewNote::titled("stay")).await.unwrap();

    let patch = NotePatch {
        site_id: Some(Uuid::new_v4()),
        ..Default::default()
    };
    let same = svc.update(&ctx, row.id, patch).await.unwrap().unwrap();

    assert_eq!(same.site_id, site);
    assert_eq!((same.id, &same.title, &same.body), (row.id, &row.title, &row.body));
    assert_eq!(same.created_at, row.created_at);
}

#[tokio::test]
async fn empty_patch_still_stamps_updated_at() {
    let svc = service(setup("crud_empty_patch").await);
    let ctx = site_ctx(Uuid::new_v4());
    let row = svc.create(&ctx, NewNote::titled("idle")).await.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    let touched = svc
        .update(&ctx, row.id, NotePatch::default())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(touched.title, "idle");
    assert_eq!(touched.created_at, row.created_at);
    assert!(touched.updated_at > row.updated_at);

    let foreign = site_ctx(Uuid::new_v4());
    assert!(svc.update(&foreign, row.id, NotePatch::default()).await.unwrap().is_none());
}

#[tokio::test]
async fn missing_and_foreign_ids_update_identically() {
    let svc = service(setup("crud_update_missing").await);
    let s1 = site_ctx(Uuid::new_v4());
    let s2 = site_ctx(Uuid::new_v4());
    let foreign = svc.create(&s1, NewNote::titled("theirs")).await.unwrap();

    let patch = || NotePatch {
        body: Some("x".to_owned()),
        ..Default::default()
    };
    let missing = svc.update(&s2, Uuid::new_v4(), patch()).await.unwrap();
    let out_of_scope = svc.update(&s2, foreign.id, patch()).await.unwrap();

    assert_eq!(missing, None);
    assert_eq!(out_of_scope, None);
}

#[tokio::test]
async fn create_without_site_inserts_nothing() {
    let svc = service(setup("crud_missing_site").await);
    let no_site = RequestContext::builder().tenant_id(Uuid::new_v4()).build();

    let err = svc
        .create(&no_site, NewNote::titled("orphan"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ScopeError::MissingScope {
            dimension: ScopeDimension::Site
        }
    ));

    // No site in the context means no condition at all: this counts every row.
    let everything = svc
        .list(&RequestContext::anonymous(), ListQuery::default())
        .await
        .unwrap();
    assert_eq!(everything.total, 0);
}

#[tokio::test]
async fn site_in_body_is_overwritten_by_context() {
    let svc = service(setup("crud_forged_site").await);
    let site = Uuid::new_v4();
    let ctx = site_ctx(site);

    let forged = NewNote {
        site_id: Some(Uuid::new_v4()),
        ..NewNote::titled("forged")
    };
    let row = svc.create(&ctx, forged).await.unwrap();

    assert_eq!(row.site_id, site);
    assert_eq!(svc.list(&ctx, ListQuery::default()).await.unwrap().total, 1);
}

fn refuse_delete<'a>(
    _db: &'a Db,
    _ctx: &'a RequestContext,
    _id: Uuid,
) -> BoxFuture<'a, Result<bool, ScopeError>> {
    Box::pin(async { Err(ScopeError::Denied("notes are append-only")) })
}

#[tokio::test]
async fn override_replaces_only_its_operation() {
    let ops = CrudOps::<note::Entity, ScopeError>::generated().override_delete(refuse_delete);
    assert_eq!(ops.overrides(), &[CrudOp::Delete]);

    let svc = CrudService::new(setup("crud_override").await, ops, PageLimits::default());
    let ctx = site_ctx(Uuid::new_v4());
    let row = svc.create(&ctx, NewNote::titled("kept")).await.unwrap();

    let err = svc.delete(&ctx, row.id).await.unwrap_err();
    assert!(matches!(err, ScopeError::Denied("notes are append-only")));
    assert_eq!(svc.list(&ctx, ListQuery::default()).await.unwrap().total, 1);
}
