//! Domain-level error types.

use thiserror::Error;

use crate::domain::PostId;
use crate::validation::ValidationErrors;

/// Domain errors - what the post store reports to its callers.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity_type} with ID {id} not found")]
    NotFound { entity_type: &'static str, id: PostId },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Storage failure: {0}")]
    Storage(#[from] RepoError),
}

impl DomainError {
    pub fn post_not_found(id: PostId) -> Self {
        Self::NotFound {
            entity_type: "Post",
            id,
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}
