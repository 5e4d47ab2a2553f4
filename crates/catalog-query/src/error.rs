//! Error types for the catalog-query crate.

use thiserror::Error;

use catalog_core::ErrorKind;
use catalog_store::StoreError;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Invalid arguments for {operation}: {message}")]
    InvalidArguments { operation: String, message: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A multi-step mutation applied its first step and failed a later one.
    /// `partial` is the result of the steps that did apply.
    #[error("{operation} partially applied: {message}: {source}")]
    PartialMutation {
        operation: String,
        message: String,
        partial: serde_json::Value,
        #[source]
        source: Box<QueryError>,
    },

    #[error("Operation {0} is not bound to exactly one declared operation and one resolver")]
    UnmappedOperation(String),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl QueryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            QueryError::UnknownOperation(_) => ErrorKind::UnknownOperation,
            QueryError::MalformedRequest(_) | QueryError::InvalidArguments { .. } => {
                ErrorKind::ValidationError
            }
            QueryError::Store(e) => e.kind(),
            QueryError::PartialMutation { .. } => ErrorKind::PartialMutationFailure,
            QueryError::UnmappedOperation(_)
            | QueryError::InvalidSchema(_)
            | QueryError::Serialization(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn invalid(operation: &str, message: impl Into<String>) -> Self {
        QueryError::InvalidArguments {
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, QueryError>;
