//! REST error mapping for the Resource Registry module.

use axum::response::{IntoResponse, Response};
use http::StatusCode;

use super::problem::Problem;
use crate::domain::error::DomainError;

/// Wrapper making `DomainError` usable as an axum response via `?`.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        Problem::from(self.0).into_response()
    }
}

/// Result alias for REST handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl From<DomainError> for Problem {
    fn from(e: DomainError) -> Self {
        let trace_id = tracing::Span::current()
            .id()
            .map(|id| id.into_u64().to_string());

        let (status, code, title, detail) = match &e {
            DomainError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                "RESOURCE_REGISTRY_NOT_FOUND",
                "Resource not found",
                e.to_string(),
            ),
            DomainError::AmbiguousType { .. } => (
                StatusCode::BAD_REQUEST,
                "RESOURCE_REGISTRY_AMBIGUOUS_TYPE",
                "Ambiguous type reference",
                e.to_string(),
            ),
            DomainError::Conflict(_) => (
                StatusCode::CONFLICT,
                "RESOURCE_REGISTRY_CONFLICT",
                "Name conflict",
                e.to_string(),
            ),
            DomainError::Validation { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "RESOURCE_REGISTRY_VALIDATION_FAILED",
                "Validation failed",
                e.to_string(),
            ),
            DomainError::InvalidUsage(_) => (
                StatusCode::BAD_REQUEST,
                "RESOURCE_REGISTRY_INVALID_USAGE",
                "Invalid usage",
                e.to_string(),
            ),
            DomainError::StoreUnavailable { .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "RESOURCE_REGISTRY_STORE_UNAVAILABLE",
                "Store unavailable",
                e.to_string(),
            ),
            DomainError::Internal(inner) => {
                tracing::error!(error = ?inner, "internal error in resource_registry");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RESOURCE_REGISTRY_INTERNAL",
                    "Internal Server Error",
                    "An internal error occurred".to_owned(),
                )
            }
        };

        let mut problem = Problem::new(status, title, detail)
            .with_type(format!("https://errors.catcode.io/{code}"))
            .with_code(code);

        if let Some(id) = trace_id {
            problem = problem.with_trace_id(id);
        }

        problem
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let problem: Problem = DomainError::not_found("system").into();
        assert_eq!(problem.status, StatusCode::NOT_FOUND);
        assert_eq!(problem.code, "RESOURCE_REGISTRY_NOT_FOUND");
    }

    #[test]
    fn test_ambiguous_maps_to_400() {
        let problem: Problem = DomainError::AmbiguousType {
            name: "system".to_owned(),
            groups: vec!["a.io".to_owned(), "b.io".to_owned()],
        }
        .into();
        assert_eq!(problem.status, StatusCode::BAD_REQUEST);
        assert!(problem.detail.contains("a.io"));
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let problem: Problem = DomainError::conflict("taken").into();
        assert_eq!(problem.status, StatusCode::CONFLICT);
    }

    #[test]
    fn test_validation_maps_to_422() {
        let problem: Problem = DomainError::validation("/spec/owner", "required").into();
        assert_eq!(problem.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(problem.detail.contains("/spec/owner"));
    }

    #[test]
    fn test_invalid_usage_maps_to_400() {
        let problem: Problem = DomainError::invalid_usage("plural required").into();
        assert_eq!(problem.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_store_unavailable_maps_to_503() {
        let problem: Problem = DomainError::StoreUnavailable {
            op: "put".to_owned(),
            key: "/registry/x".to_owned(),
            reason: "connection refused".to_owned(),
        }
        .into();
        assert_eq!(problem.status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_internal_maps_to_500_without_detail_leak() {
        let problem: Problem = DomainError::Internal(anyhow::anyhow!("secret detail")).into();
        assert_eq!(problem.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!problem.detail.contains("secret"));
    }
}
