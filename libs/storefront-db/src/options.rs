use std::time::Duration;

use sea_orm::{ConnectOptions, Database};

use crate::DbError;
use crate::secure::Db;

/// Pool options applied when connecting.
///
/// Unset values fall back to the `SeaORM` / sqlx defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectOpts {
    pub max_conns: Option<u32>,
    pub min_conns: Option<u32>,
    pub acquire_timeout: Option<Duration>,
    /// Log every statement through sqlx at `info` level.
    pub sqlx_logging: bool,
}

/// Connect to `dsn` and wrap the pool in a [`Db`].
///
/// # Errors
/// Returns [`DbError::InvalidConfig`] for an empty DSN and [`DbError::Sea`]
/// when the pool cannot be established.
pub async fn connect_db(dsn: &str, opts: ConnectOpts) -> Result<Db, DbError> {
    let dsn = dsn.trim();
    if dsn.is_empty() {
        return Err(DbError::InvalidConfig("database dsn is empty".to_owned()));
    }

    let mut co = ConnectOptions::new(dsn.to_owned());
    if let Some(max) = opts.max_conns {
        co.max_connections(max);
    }
    if let Some(min) = opts.min_conns {
        co.min_connections(min);
    }
    if let Some(timeout) = opts.acquire_timeout {
        co.acquire_timeout(timeout);
    }
    co.sqlx_logging(opts.sqlx_logging);

    let conn = Database::connect(co).await?;
    let db = Db::new(conn);
    tracing::info!(
        engine = db.db_engine(),
        max_conns = opts.max_conns,
        "database pool ready"
    );
    Ok(db)
}
