//! Handlers for the catalog queries that go beyond CRUD.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Extension, Path};
use http::StatusCode;
use storefront_db::secure::RequestContext;
use tracing::field::Empty;
use uuid::Uuid;

use crate::api::rest::dto::{
    AdDto, CategoryNodeDto, DeletedCountResponse, IdsRequest, ItemsRequest, ProductDetailDto,
    SkuDto, UpdatedCountResponse,
};
use crate::api::rest::problem::ApiResult;
use crate::domain::model::{NewSku, SortOrderUpdate};
use crate::domain::service::AppServices;

#[tracing::instrument(skip_all)]
pub async fn category_tree(
    Extension(ctx): Extension<RequestContext>,
    Extension(app): Extension<Arc<AppServices>>,
) -> ApiResult<Json<Vec<CategoryNodeDto>>> {
    let tree = app.categories.tree(&ctx).await?;
    Ok(Json(tree.into_iter().map(Into::into).collect()))
}

#[tracing::instrument(skip_all, fields(items = Empty))]
pub async fn reorder_categories(
    Extension(ctx): Extension<RequestContext>,
    Extension(app): Extension<Arc<AppServices>>,
    body: Result<Json<ItemsRequest<SortOrderUpdate>>, JsonRejection>,
) -> ApiResult<Json<UpdatedCountResponse>> {
    let Json(req) = body?;
    tracing::Span::current().record("items", req.items.len());
    let updated = app.categories.reorder(&ctx, req.items).await?;
    Ok(Json(UpdatedCountResponse { updated }))
}

#[tracing::instrument(skip_all)]
pub async fn product_detail(
    Extension(ctx): Extension<RequestContext>,
    Extension(app): Extension<Arc<AppServices>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<ProductDetailDto>> {
    let Path(id) = id?;
    let detail = app.products.detail(&ctx, id).await?;
    Ok(Json(detail.into()))
}

#[tracing::instrument(skip_all)]
pub async fn create_skus(
    Extension(ctx): Extension<RequestContext>,
    Extension(app): Extension<Arc<AppServices>>,
    body: Result<Json<ItemsRequest<NewSku>>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Vec<SkuDto>>)> {
    let Json(req) = body?;
    let created = app.skus.create_batch(&ctx, req.items).await?;
    Ok((
        StatusCode::CREATED,
        Json(created.into_iter().map(Into::into).collect()),
    ))
}

#[tracing::instrument(skip_all)]
pub async fn delete_skus(
    Extension(ctx): Extension<RequestContext>,
    Extension(app): Extension<Arc<AppServices>>,
    body: Result<Json<IdsRequest>, JsonRejection>,
) -> ApiResult<Json<DeletedCountResponse>> {
    let Json(req) = body?;
    let deleted = app.skus.delete_batch(&ctx, req.ids).await?;
    Ok(Json(DeletedCountResponse { deleted }))
}

#[tracing::instrument(skip_all)]
pub async fn active_ads(
    Extension(ctx): Extension<RequestContext>,
    Extension(app): Extension<Arc<AppServices>>,
) -> ApiResult<Json<Vec<AdDto>>> {
    let ads = app.ads.active(&ctx).await?;
    Ok(Json(ads.into_iter().map(Into::into).collect()))
}
