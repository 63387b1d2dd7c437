use futures::future::BoxFuture;
use sea_orm::{
    ConnectionTrait, DatabaseBackend, DatabaseConnection, DatabaseTransaction, TransactionTrait,
};

use crate::DbError;

tokio::task_local! {
    static IN_TX: ();
}

/// Handle to the shared connection pool.
///
/// Cheap to clone. Services receive it at startup and borrow short-lived
/// runners from it: [`Db::conn`] for single statements and
/// [`Db::transaction`] for multi-row work.
#[derive(Clone, Debug)]
pub struct Db {
    conn: DatabaseConnection,
}

/// Non-transactional runner borrowed from a [`Db`].
pub struct DbConn<'a> {
    pub(crate) conn: &'a DatabaseConnection,
}

/// Transactional runner handed to the closure of [`Db::transaction`].
pub struct DbTx<'a> {
    pub(crate) tx: &'a DatabaseTransaction,
}

impl Db {
    #[must_use]
    pub(crate) fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Borrow a non-transactional runner.
    ///
    /// # Errors
    /// Returns [`DbError::ConnRequestedInsideTx`] when called from inside a
    /// [`Db::transaction`] closure on the same task; statements there must
    /// use the transaction runner or they would escape the transaction.
    pub fn conn(&self) -> Result<DbConn<'_>, DbError> {
        if IN_TX.try_with(|()| ()).is_ok() {
            return Err(DbError::ConnRequestedInsideTx);
        }
        Ok(DbConn { conn: &self.conn })
    }

    #[must_use]
    pub fn backend(&self) -> DatabaseBackend {
        self.conn.get_database_backend()
    }

    /// Database engine identifier for logging.
    #[must_use]
    pub fn db_engine(&self) -> &'static str {
        match self.backend() {
            DatabaseBackend::Sqlite => "sqlite",
            DatabaseBackend::Postgres => "postgres",
            DatabaseBackend::MySql => "mysql",
        }
    }

    /// Raw connection for migrations. Not exposed outside the crate.
    #[must_use]
    pub(crate) fn sea_internal(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Run `f` inside one database transaction.
    ///
    /// Commits when the closure returns `Ok`, rolls back when it returns `Err`.
    /// The closure only sees a [`DbTx`]; calling [`Db::conn`] from inside it fails.
    ///
    /// ```rust,ignore
    /// let moved = db
    ///     .transaction(move |tx| {
    ///         Box::pin(async move {
    ///             let n = Entity::update_many()
    ///                 .col_expr(Column::SortOrder, Expr::value(1))
    ///                 .secure()
    ///                 .scope_with(&ctx)
    ///                 .exec(tx)
    ///                 .await?
    ///                 .rows_affected;
    ///             Ok::<_, DomainError>(n)
    ///         })
    ///     })
    ///     .await?;
    /// ```
    ///
    /// # Errors
    /// Returns the closure's error, or a [`DbError`] converted into `E` when the
    /// transaction cannot be started or committed.
    pub async fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        T: Send,
        E: From<DbError> + Send,
        F: for<'a> FnOnce(&'a DbTx<'a>) -> BoxFuture<'a, Result<T, E>> + Send,
    {
        let txn = self.conn.begin().await.map_err(DbError::from)?;
        let tx = DbTx { tx: &txn };

        let res = IN_TX.scope((), f(&tx)).await;

        match res {
            Ok(v) => {
                txn.commit().await.map_err(DbError::from)?;
                Ok(v)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::warn!(error = %rollback_err, "transaction rollback failed");
                }
                Err(e)
            }
        }
    }
}
