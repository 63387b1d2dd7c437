//! Shared fixtures for the module's unit tests.

use sea_orm_migration::MigratorTrait;
use storefront_db::migration_runner::run_migrations_for_testing;
use storefront_db::secure::{Db, RequestContext};
use storefront_db::{ConnectOpts, connect_db};
use uuid::Uuid;

use crate::config::StorefrontConfig;
use crate::domain::service::AppServices;
use crate::infra::storage::migrations::Migrator;

/// Private in-memory database with the full schema applied.
pub async fn inmem_db() -> Db {
    let opts = ConnectOpts {
        max_conns: Some(1),
        min_conns: Some(1),
        ..Default::default()
    };
    let name = Uuid::new_v4().simple();
    let db = connect_db(&format!("sqlite:file:{name}?mode=memory&cache=shared"), opts)
        .await
        .expect("Failed to connect to database");
    run_migrations_for_testing(&db, Migrator::migrations())
        .await
        .expect("migrate");
    db
}

pub async fn services() -> (Db, AppServices) {
    let db = inmem_db().await;
    let services = AppServices::new(&db, &StorefrontConfig::default());
    (db, services)
}

/// Storefront operator bound to one site.
pub fn site_ctx(site: Uuid) -> RequestContext {
    RequestContext::builder()
        .user_id(Uuid::new_v4())
        .site_id(site)
        .permissions(["*"])
        .build()
}

/// Admin user inside one tenant and department.
pub fn admin_ctx(tenant: Uuid, dept: Uuid) -> RequestContext {
    RequestContext::builder()
        .user_id(Uuid::new_v4())
        .tenant_id(tenant)
        .current_dept_id(dept)
        .role("admin")
        .permissions(["*"])
        .build()
}
