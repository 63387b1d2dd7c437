use http::StatusCode;

use super::problem::Problem;
use crate::domain::error::DomainError;

/// Map a domain error to a problem document.
///
/// Database and internal failures are logged here and reported without
/// details.
#[must_use]
pub fn domain_error_to_problem(e: &DomainError) -> Problem {
    let trace_id = tracing::Span::current()
        .id()
        .map(|id| id.into_u64().to_string());

    let problem = match e {
        DomainError::NotFound { entity, id } => {
            Problem::not_found(format!("{entity} with id {id} was not found"))
        }
        DomainError::Validation { .. } => {
            Problem::new(StatusCode::BAD_REQUEST, "Validation Failed", e.to_string())
        }
        DomainError::Conflict(msg) => Problem::new(StatusCode::CONFLICT, "Conflict", msg.clone()),
        DomainError::Forbidden(msg) => Problem::forbidden(msg.clone()),
        DomainError::MissingScope(dimension) => Problem::forbidden(format!(
            "request has no {} scope",
            dimension.label()
        )),
        DomainError::Database { .. } => {
            tracing::error!(error = ?e, "Database error occurred");
            Problem::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                "An internal database error occurred",
            )
        }
        DomainError::Internal(_) => {
            tracing::error!(error = ?e, "Internal error occurred");
            Problem::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                "An internal error occurred",
            )
        }
    };
    problem.with_trace_id(trace_id)
}

impl From<DomainError> for Problem {
    fn from(e: DomainError) -> Self {
        domain_error_to_problem(&e)
    }
}
