//! Repository error definitions.

use thiserror::Error;

/// Errors returned by routing repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No routing rule has this id.
    #[error("routing rule {0} not found")]
    NotFound(i64),

    /// Input did not carry the fields the operation needs.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The database rejected or failed the statement.
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl RepositoryError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RepositoryError::NotFound(_) => "not_found",
            RepositoryError::Validation(_) => "invalid",
            RepositoryError::Storage(_) => "storage_error",
        }
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(RepositoryError::NotFound(1).kind(), "not_found");
        assert_eq!(RepositoryError::Validation("empty".into()).kind(), "invalid");
        assert_eq!(RepositoryError::Storage(sqlx::Error::RowNotFound).kind(), "storage_error");
    }

    #[test]
    fn test_display() {
        assert_eq!(RepositoryError::NotFound(7).to_string(), "routing rule 7 not found");
        assert_eq!(
            RepositoryError::Validation("no updatable fields supplied".into()).to_string(),
            "invalid input: no updatable fields supplied"
        );
    }
}
