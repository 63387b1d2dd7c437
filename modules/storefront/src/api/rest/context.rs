//! Trusted-header request context.
//!
//! Stands in for the authentication collaborator that normally fronts this
//! service: it reads identity and scope from `x-*` headers and stores a
//! [`RequestContext`] in the request extensions. Only deploy behind a proxy
//! that strips these headers from client traffic.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::HeaderMap;
use storefront_db::secure::RequestContext;
use uuid::Uuid;

use super::problem::Problem;

pub const USER_ID: &str = "x-user-id";
pub const TENANT_ID: &str = "x-tenant-id";
pub const SITE_ID: &str = "x-site-id";
pub const DEPT_ID: &str = "x-dept-id";
pub const ROLE: &str = "x-role";
pub const FACTORY_ID: &str = "x-factory-id";
pub const EXPORTER_ID: &str = "x-exporter-id";
/// Comma-separated permission names.
pub const PERMISSIONS: &str = "x-permissions";

pub async fn context_middleware(mut req: Request, next: Next) -> Response {
    match context_from_headers(req.headers()) {
        Ok(ctx) => {
            tracing::debug!(
                user_id = %ctx.user_id(),
                tenant_id = ?ctx.tenant_id(),
                site_id = ?ctx.site_id(),
                "request context"
            );
            req.extensions_mut().insert(ctx);
            next.run(req).await
        }
        Err(problem) => problem.into_response(),
    }
}

/// Build a context from the trusted headers. Absent headers leave the field empty.
///
/// # Errors
/// Returns a 400 problem when a header is not valid UTF-8 or an id header is
/// not a UUID.
pub fn context_from_headers(headers: &HeaderMap) -> Result<RequestContext, Problem> {
    let mut b = RequestContext::builder();

    if let Some(v) = uuid_header(headers, USER_ID)? {
        b = b.user_id(v);
    }
    if let Some(v) = uuid_header(headers, TENANT_ID)? {
        b = b.tenant_id(v);
    }
    if let Some(v) = uuid_header(headers, SITE_ID)? {
        b = b.site_id(v);
    }
    if let Some(v) = uuid_header(headers, DEPT_ID)? {
        b = b.current_dept_id(v);
    }
    if let Some(v) = uuid_header(headers, FACTORY_ID)? {
        b = b.factory_id(v);
    }
    if let Some(v) = uuid_header(headers, EXPORTER_ID)? {
        b = b.exporter_id(v);
    }
    if let Some(role) = str_header(headers, ROLE)? {
        b = b.role(role);
    }
    if let Some(list) = str_header(headers, PERMISSIONS)? {
        b = b.permissions(list.split(',').map(str::trim).filter(|p| !p.is_empty()));
    }

    Ok(b.build())
}

fn str_header<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>, Problem> {
    let Some(raw) = headers.get(name) else {
        return Ok(None);
    };
    let value = raw
        .to_str()
        .map_err(|_| Problem::bad_request(format!("header {name} is not valid text")))?
        .trim();
    Ok((!value.is_empty()).then_some(value))
}

fn uuid_header(headers: &HeaderMap, name: &str) -> Result<Option<Uuid>, Problem> {
    str_header(headers, name)?
        .map(|v| {
            Uuid::parse_str(v)
                .map_err(|_| Problem::bad_request(format!("header {name} is not a valid UUID")))
        })
        .transpose()
}
