//! Generic CRUD handlers, instantiated once per [`RestResource`].

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Extension, Path, Query};
use http::StatusCode;
use serde::de::DeserializeOwned;
use storefront_db::crud::{ListQuery, Page};
use storefront_db::secure::RequestContext;
use uuid::Uuid;

use super::dto::DeletedResponse;
use super::problem::{ApiResult, Problem};
use super::resource::RestResource;
use crate::domain::service::AppServices;

mod catalog;

pub use catalog::{
    active_ads, category_tree, create_skus, delete_skus, product_detail, reorder_categories,
};

#[tracing::instrument(skip_all, fields(entity = E::NAME))]
pub async fn list<E: RestResource>(
    Extension(ctx): Extension<RequestContext>,
    Extension(app): Extension<Arc<AppServices>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<Page<E::Dto>>> {
    let Query(query) = query?;
    let page = E::service(&app).list(&ctx, query).await?;
    Ok(Json(page.map(E::Dto::from)))
}

#[tracing::instrument(skip_all, fields(entity = E::NAME))]
pub async fn create<E>(
    Extension(ctx): Extension<RequestContext>,
    Extension(app): Extension<Arc<AppServices>>,
    body: Result<Json<E::Create>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<E::Dto>)>
where
    E: RestResource,
    E::Create: DeserializeOwned,
{
    let Json(body) = body?;
    let row = E::service(&app).create(&ctx, body).await?;
    Ok((StatusCode::CREATED, Json(row.into())))
}

/// `PUT /{id}`: 404 for ids that are missing or outside the scope alike.
#[tracing::instrument(skip_all, fields(entity = E::NAME))]
pub async fn update<E>(
    Extension(ctx): Extension<RequestContext>,
    Extension(app): Extension<Arc<AppServices>>,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<E::Patch>, JsonRejection>,
) -> ApiResult<Json<E::Dto>>
where
    E: RestResource,
    E::Patch: DeserializeOwned,
{
    let Path(id) = id?;
    let Json(patch) = body?;
    E::service(&app)
        .update(&ctx, id, patch)
        .await?
        .map(|row| Json(row.into()))
        .ok_or_else(|| Problem::not_found(format!("{} with id {id} was not found", E::NAME)))
}

#[tracing::instrument(skip_all, fields(entity = E::NAME))]
pub async fn delete<E: RestResource>(
    Extension(ctx): Extension<RequestContext>,
    Extension(app): Extension<Arc<AppServices>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<DeletedResponse>> {
    let Path(id) = id?;
    let deleted = E::service(&app).delete(&ctx, id).await?;
    Ok(Json(DeletedResponse { deleted }))
}
