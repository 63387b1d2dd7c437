use std::sync::Arc;

use axum::handler::Handler;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{MethodRouter, get, post, put};
use axum::{Extension, Json, Router};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::context::context_middleware;
use super::guard::{require_permission, scope_guard};
use super::handlers;
use super::resource::RestResource;
use crate::domain::service::AppServices;
use crate::infra::storage::entity::{ad, inquiry, master_category, product, site_config, sku};

/// The full HTTP surface: every resource under `api_prefix`, plus `GET /health`.
///
/// An empty prefix or `/` mounts the resources at the root.
pub fn router(services: Arc<AppServices>, api_prefix: &str) -> Router {
    let api = Router::new();
    let api = nest::<site_config::Entity>(api, crud_routes::<site_config::Entity>());
    let api = nest::<master_category::Entity>(api, category_routes());
    let api = nest::<product::Entity>(api, product_routes());
    let api = nest::<sku::Entity>(api, sku_routes());
    let api = nest::<ad::Entity>(api, ad_routes());
    let api = nest::<inquiry::Entity>(api, crud_routes::<inquiry::Entity>());
    let api = api.layer(from_fn(context_middleware));

    let prefix = api_prefix.trim_end_matches('/');
    let app = Router::new().route("/health", get(health));
    let app = if prefix.is_empty() {
        app.merge(api)
    } else {
        app.nest(prefix, api)
    };
    app.layer(Extension(services))
}

/// Mount `routes` at `/<entity-name>` behind the scope guard of `E`.
fn nest<E: RestResource>(api: Router, routes: Router) -> Router {
    api.nest(
        &format!("/{}", E::NAME),
        routes.route_layer(from_fn(scope_guard::<E>)),
    )
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Permission layer for one handler.
macro_rules! guarded {
    ($handler:expr, $permission:expr) => {
        $handler.layer(from_fn_with_state($permission, require_permission))
    };
}

/// `GET /`, `POST /`, `PUT /{id}` and `DELETE /{id}` for `E`.
fn crud_routes<E>() -> Router
where
    E: RestResource,
    E::Create: DeserializeOwned,
    E::Patch: DeserializeOwned,
{
    let p = E::PERMISSIONS;
    let collection: MethodRouter = get(guarded!(handlers::list::<E>, p.view))
        .post(guarded!(handlers::create::<E>, p.create));
    let item: MethodRouter = put(guarded!(handlers::update::<E>, p.update))
        .delete(guarded!(handlers::delete::<E>, p.delete));

    Router::new().route("/", collection).route("/{id}", item)
}

fn category_routes() -> Router {
    type E = master_category::Entity;
    let p = <E as RestResource>::PERMISSIONS;
    crud_routes::<E>()
        .route("/tree", get(guarded!(handlers::category_tree, p.view)))
        .route(
            "/reorder",
            put(guarded!(handlers::reorder_categories, p.update)),
        )
}

fn product_routes() -> Router {
    type E = product::Entity;
    let p = <E as RestResource>::PERMISSIONS;
    crud_routes::<E>()
        .route(
            "/detail/{id}",
            get(guarded!(handlers::product_detail, p.view)),
        )
}

fn sku_routes() -> Router {
    type E = sku::Entity;
    let p = <E as RestResource>::PERMISSIONS;
    crud_routes::<E>()
        .route(
            "/batch",
            post(guarded!(handlers::create_skus, p.create))
                .delete(guarded!(handlers::delete_skus, p.delete)),
        )
}

fn ad_routes() -> Router {
    type E = ad::Entity;
    let p = <E as RestResource>::PERMISSIONS;
    crud_routes::<E>()
        .route("/active", get(guarded!(handlers::active_ads, p.view)))
}
