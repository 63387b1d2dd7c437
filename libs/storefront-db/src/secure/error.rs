use sea_orm::DbErr;
use storefront_security::ScopeDimension;

use crate::DbError;

/// Errors raised by scoped queries.
#[derive(Debug, thiserror::Error)]
pub enum ScopeError {
    #[error("database error: {0}")]
    Db(#[from] DbErr),

    /// Programmer error: the query cannot be built for this entity.
    #[error("invalid scope usage: {0}")]
    Invalid(&'static str),

    #[error("access denied: {0}")]
    Denied(&'static str),

    /// The entity declares a scoping column but the request carries no value for it.
    #[error("request context has no {dimension} scope")]
    MissingScope { dimension: ScopeDimension },
}

impl ScopeError {
    /// Whether the underlying database error is a unique-constraint violation.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            Self::Db(err) if matches!(err.sql_err(), Some(sea_orm::SqlErr::UniqueConstraintViolation(_)))
        )
    }
}

impl From<DbError> for ScopeError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Sea(e) => Self::Db(e),
            DbError::InvalidConfig(_) => Self::Invalid("invalid database configuration"),
            DbError::ConnRequestedInsideTx => {
                Self::Invalid("conn() requested inside an active transaction")
            }
        }
    }
}
