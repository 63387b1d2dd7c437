//! Route guards that run before a handler.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use storefront_db::secure::{RequestContext, ScopableEntity, missing_scope};

use super::problem::Problem;
use crate::domain::error::DomainError;

/// Reject the request with 403 unless its context grants `permission`.
///
/// Installed per route with `from_fn_with_state(permission, require_permission)`.
pub async fn require_permission(
    State(permission): State<&'static str>,
    req: Request,
    next: Next,
) -> Response {
    let granted = req
        .extensions()
        .get::<RequestContext>()
        .is_some_and(|ctx| ctx.has_permission(permission));
    if !granted {
        tracing::debug!(permission, "permission denied");
        return Problem::forbidden(format!("missing permission {permission}")).into_response();
    }
    next.run(req).await
}

/// Reject the request with 403 when its context lacks a value for one of the
/// scoping dimensions `E` declares.
pub async fn scope_guard<E: ScopableEntity>(req: Request, next: Next) -> Response {
    let Some(ctx) = req.extensions().get::<RequestContext>() else {
        return Problem::forbidden("request context missing").into_response();
    };
    if let Some(dimension) = missing_scope::<E>(ctx) {
        tracing::debug!(dimension = %dimension, "scope guard rejected request");
        return Problem::from(DomainError::MissingScope(dimension)).into_response();
    }
    next.run(req).await
}
