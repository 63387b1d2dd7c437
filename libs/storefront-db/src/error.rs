use sea_orm::DbErr;

/// Connection and infrastructure errors of the database layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Sea(#[from] DbErr),

    #[error("invalid database configuration: {0}")]
    InvalidConfig(String),

    /// A plain connection was requested while a transaction is running on the
    /// current task. Use the transaction runner instead.
    #[error("conn() requested inside an active transaction")]
    ConnRequestedInsideTx,
}
