//! Application services orchestrating domain logic and side effects.
use crate::domain::{DrinkId, TypeConstraintError};
use crate::repository::RepositoryError;

pub mod drinks;

/// Convenience alias for service results.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by service operations.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("drink {0} not found")]
    NotFound(DrinkId),
    #[error("duplicate title `{0}`")]
    DuplicateTitle(String),
}

impl From<TypeConstraintError> for ServiceError {
    fn from(err: TypeConstraintError) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => ServiceError::NotFound(id),
            RepositoryError::DuplicateTitle(title) => {
                ServiceError::DuplicateTitle(title.as_str().to_string())
            }
        }
    }
}
