use std::time::Duration;

use anyhow::Context;
use axum::Router;
use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use http::{HeaderName, HeaderValue, Request, Response, StatusCode};
use storefront::Storefront;
use storefront_db::connect_db;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::field::Empty;
use tracing::{Span, info, warn};
use uuid::Uuid;

use crate::config::{AppConfig, ServerConfig};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Generates a v7 UUID for requests that arrive without `x-request-id`.
#[derive(Clone, Copy, Default)]
pub struct MakeReqId;

impl MakeRequestId for MakeReqId {
    fn make_request_id<B>(&mut self, _req: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::now_v7().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Wrap `router` in the HTTP middleware stack.
///
/// Outermost first: request id, trace, timeout, body limit.
#[must_use]
pub fn apply_middleware(mut router: Router, cfg: &ServerConfig) -> Router {
    // 4) Body limit
    router = router.layer(RequestBodyLimitLayer::new(cfg.body_limit_bytes));
    router = router.layer(DefaultBodyLimit::max(cfg.body_limit_bytes));

    // 3) Timeout
    router = router.layer(TimeoutLayer::with_status_code(
        StatusCode::GATEWAY_TIMEOUT,
        cfg.request_timeout(),
    ));

    // 2) Trace; the request id is already set by the outer layer
    router = router.layer(
        TraceLayer::new_for_http()
            .make_span_with(|req: &Request<Body>| {
                let rid = req
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("n/a");
                tracing::info_span!(
                    "http_request",
                    method = %req.method(),
                    uri = %req.uri().path(),
                    version = ?req.version(),
                    request_id = %rid,
                    status = Empty,
                    latency_ms = Empty,
                )
            })
            .on_response(|res: &Response<Body>, latency: Duration, span: &Span| {
                span.record("status", res.status().as_u16());
                span.record("latency_ms", latency.as_millis());
            }),
    );

    // 1) Request id: generate if missing, echo on the response
    let x_request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));
    router.layer(SetRequestIdLayer::new(x_request_id, MakeReqId))
}

/// Full application: storefront routes behind the middleware stack.
#[must_use]
pub fn build_app(storefront: &Storefront, cfg: &ServerConfig) -> Router {
    apply_middleware(storefront.router(&cfg.api_prefix), cfg)
}

/// Connect the database, optionally migrate, and serve until Ctrl-C.
///
/// # Errors
/// Fails if the database is unreachable, a migration fails or the address cannot be bound.
pub async fn run(cfg: &AppConfig) -> anyhow::Result<()> {
    let db = connect_db(&cfg.database.dsn, cfg.database.connect_opts())
        .await
        .context("failed to connect to database")?;

    if cfg.database.migrate_on_start {
        Storefront::migrate(&db)
            .await
            .context("failed to apply migrations")?;
    }

    let storefront = Storefront::new(&db, &cfg.storefront);
    let app = build_app(&storefront, &cfg.server);

    let listener = TcpListener::bind(&cfg.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.server.bind_addr))?;
    info!(
        addr = %cfg.server.bind_addr,
        api_prefix = %cfg.server.api_prefix,
        "storefront server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("storefront server stopped");
    Ok(())
}

/// Connect and apply migrations, then exit.
///
/// # Errors
/// Fails if the database is unreachable or a migration fails.
pub async fn migrate(cfg: &AppConfig) -> anyhow::Result<()> {
    let db = connect_db(&cfg.database.dsn, cfg.database.connect_opts())
        .await
        .context("failed to connect to database")?;
    Storefront::migrate(&db)
        .await
        .context("failed to apply migrations")?;
    info!("migrations applied");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use storefront::StorefrontConfig;
    use storefront_db::ConnectOpts;
    use tower::ServiceExt;

    async fn app(cfg: &ServerConfig) -> Router {
        let opts = ConnectOpts {
            max_conns: Some(1),
            min_conns: Some(1),
            ..Default::default()
        };
        let db = connect_db("sqlite::memory:", opts).await.unwrap();
        Storefront::migrate(&db).await.unwrap();
        build_app(&Storefront::new(&db, &StorefrontConfig::default()), cfg)
    }

    #[tokio::test]
    async fn request_id_is_generated_and_echoed() {
        let app = app(&ServerConfig::default()).await;

        let res = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let rid = res.headers().get(REQUEST_ID_HEADER).unwrap();
        assert!(Uuid::parse_str(rid.to_str().unwrap()).is_ok());

        let res = app
            .oneshot(
                Request::get("/health")
                    .header(REQUEST_ID_HEADER, "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.headers().get(REQUEST_ID_HEADER).unwrap(), "abc-123");
    }

    #[tokio::test]
    async fn routes_are_mounted_under_prefix() {
        let cfg = ServerConfig {
            api_prefix: "/v1".to_owned(),
            ..ServerConfig::default()
        };
        let app = app(&cfg).await;

        let res = app
            .oneshot(
                Request::get("/v1/product")
                    .header("x-site-id", Uuid::new_v4().to_string())
                    .header("x-permissions", "PRODUCTS_TABLE_VIEW")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = res.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["total"], 0);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let cfg = ServerConfig {
            body_limit_bytes: 64,
            ..ServerConfig::default()
        };
        let app = app(&cfg).await;

        let big = format!(r#"{{"name": "{}"}}"#, "x".repeat(256));
        let res = app
            .oneshot(
                Request::post("/api/product")
                    .header("content-type", "application/json")
                    .header("content-length", big.len())
                    .header("x-site-id", Uuid::new_v4().to_string())
                    .header("x-permissions", "PRODUCTS_TABLE_CREATE")
                    .body(Body::from(big))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
