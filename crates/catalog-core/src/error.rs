use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type for the catalog domain layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid id: {0:?} is not a well-formed identifier")]
    InvalidId(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// The error kinds reported to callers in a response payload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    UnknownOperation,
    ValidationError,
    NotFound,
    InvalidId,
    PartialMutationFailure,
    /// Backend failures (connection, query, decoding) and use of a closed store.
    Internal,
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::Config(_) => ErrorKind::Internal,
            CatalogError::InvalidId(_) => ErrorKind::InvalidId,
            CatalogError::Validation(_) => ErrorKind::ValidationError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_serializes_screaming_snake() {
        let json = serde_json::to_string(&ErrorKind::PartialMutationFailure).unwrap();
        assert_eq!(json, "\"PARTIAL_MUTATION_FAILURE\"");

        let json = serde_json::to_string(&ErrorKind::NotFound).unwrap();
        assert_eq!(json, "\"NOT_FOUND\"");
    }

    #[test]
    fn catalog_error_kinds() {
        assert_eq!(
            CatalogError::InvalidId("x".to_string()).kind(),
            ErrorKind::InvalidId
        );
        assert_eq!(
            CatalogError::Validation("x".to_string()).kind(),
            ErrorKind::ValidationError
        );
    }
}
