//! Catalog Store — the entity store adapter behind the graph resolvers.
//!
//! Every read and write of users and products flows through the
//! [`EntityStore`] trait. Two backends are provided: an in-memory store for
//! tests and single-process use, and a Neo4j-backed document store.

pub mod client;
pub mod error;
pub mod memory;
pub mod mutations;
pub mod populate;
pub mod queries;
pub mod store;

pub use client::Neo4jStore;
pub use error::{Collection, StoreError};
pub use memory::MemoryStore;
pub use populate::populate;
pub use store::{open_store, EntityStore};
