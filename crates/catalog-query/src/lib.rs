//! catalog-query: Schema-driven query and mutation engine for the catalog.
//!
//! Binds the static schema declaration to one resolver per operation,
//! validates incoming arguments against the declared signatures, and runs
//! the resolver against an injected entity store.

pub mod arguments;
pub mod engine;
pub mod error;
pub mod resolvers;
pub mod response;
pub mod schema;

pub use engine::QueryEngine;
pub use error::QueryError;
pub use resolvers::Resolvers;
pub use response::{parse_document, ErrorPayload, Request, Response};
pub use schema::Schema;
