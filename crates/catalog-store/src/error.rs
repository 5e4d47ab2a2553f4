//! Errors from entity store operations.

use std::fmt;

use catalog_core::{CatalogError, ErrorKind};

/// The two collections held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    User,
    Product,
}

impl Collection {
    /// Node label used by the Neo4j backend.
    pub fn label(&self) -> &'static str {
        match self {
            Collection::User => "User",
            Collection::Product => "Product",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{collection} not found: no record with id {id}")]
    NotFound { collection: Collection, id: String },

    #[error("Invalid id: {0:?} is not a well-formed identifier")]
    InvalidId(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("Neo4j query error: {0}")]
    Query(#[from] neo4rs::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Store is closed")]
    Closed,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::InvalidId(_) => ErrorKind::InvalidId,
            StoreError::Validation(_) => ErrorKind::ValidationError,
            StoreError::Connection(_)
            | StoreError::Query(_)
            | StoreError::Serialization(_)
            | StoreError::Closed => ErrorKind::Internal,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

impl From<CatalogError> for StoreError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::InvalidId(raw) => StoreError::InvalidId(raw),
            CatalogError::Validation(msg) => StoreError::Validation(msg),
            CatalogError::Config(msg) => StoreError::Connection(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
