use storefront_db::DbError;
use storefront_db::secure::{ScopeDimension, ScopeError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Validation error on field '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Access forbidden: {0}")]
    Forbidden(String),

    /// The request context lacks a value the entity is scoped by.
    #[error("Request has no {0} scope")]
    MissingScope(ScopeDimension),

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    #[must_use]
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }

    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    #[must_use]
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<ScopeError> for DomainError {
    fn from(e: ScopeError) -> Self {
        if e.is_unique_violation() {
            return Self::conflict("a row with the same unique values already exists");
        }
        match e {
            ScopeError::Db(db) => Self::database(db.to_string()),
            ScopeError::Denied(msg) => Self::Forbidden(msg.to_owned()),
            ScopeError::Invalid(msg) => Self::internal(format!("scope invalid: {msg}")),
            ScopeError::MissingScope { dimension } => Self::MissingScope(dimension),
        }
    }
}

impl From<DbError> for DomainError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::Sea(db) => ScopeError::Db(db).into(),
            other @ (DbError::InvalidConfig(_) | DbError::ConnRequestedInsideTx) => {
                Self::internal(other.to_string())
            }
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use sea_orm::{DbErr, RuntimeErr};

    #[test]
    fn scope_errors_map_to_domain_kinds() {
        let e: DomainError = ScopeError::Denied("scope columns are immutable").into();
        assert!(matches!(e, DomainError::Forbidden(_)));

        let e: DomainError = ScopeError::MissingScope {
            dimension: ScopeDimension::Site,
        }
        .into();
        assert!(matches!(e, DomainError::MissingScope(ScopeDimension::Site)));

        let e: DomainError = ScopeError::Invalid("no resource column").into();
        assert!(matches!(e, DomainError::Internal(_)));
    }

    #[test]
    fn plain_db_error_is_database() {
        let e: DomainError =
            ScopeError::Db(DbErr::Conn(RuntimeErr::Internal("gone".to_owned()))).into();
        assert!(matches!(e, DomainError::Database { .. }));

        let e: DomainError = DbError::ConnRequestedInsideTx.into();
        assert!(matches!(e, DomainError::Internal(_)));
    }
}
