use std::sync::Arc;

use axum::Router;
use storefront_db::DbError;
use storefront_db::migration_runner::run_migrations;
use storefront_db::secure::Db;
use tracing::info;

use crate::api::rest::routes;
use crate::config::StorefrontConfig;
use crate::domain::service::AppServices;
use crate::infra::storage::migrations::Migrator;

/// The storefront module: services bound to one database pool.
#[derive(Clone)]
pub struct Storefront {
    services: Arc<AppServices>,
}

impl Storefront {
    #[must_use]
    pub fn new(db: &Db, config: &StorefrontConfig) -> Self {
        info!(
            engine = db.db_engine(),
            default_page_size = config.default_page_size,
            max_page_size = config.max_page_size,
            "Initializing storefront module"
        );
        Self {
            services: Arc::new(AppServices::new(db, config)),
        }
    }

    /// Apply the module's schema migrations.
    ///
    /// # Errors
    /// Returns [`DbError::Sea`] if a migration fails.
    pub async fn migrate(db: &Db) -> Result<(), DbError> {
        run_migrations::<Migrator>(db).await
    }

    #[must_use]
    pub fn services(&self) -> &Arc<AppServices> {
        &self.services
    }

    /// HTTP routes with resources mounted under `api_prefix`.
    #[must_use]
    pub fn router(&self, api_prefix: &str) -> Router {
        routes::router(Arc::clone(&self.services), api_prefix)
    }
}
