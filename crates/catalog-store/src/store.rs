//! The entity store contract shared by every backend.

use std::sync::Arc;

use async_trait::async_trait;

use catalog_core::config::{StoreBackend, StoreConfig};
use catalog_core::{NewProduct, NewUser, Product, ProductId, User, UserPatch};

use crate::client::Neo4jStore;
use crate::error::Result;
use crate::memory::MemoryStore;

/// Typed CRUD over the `User` and `Product` collections.
///
/// Lookups take identifiers as received from callers: a malformed id fails
/// with [`StoreError::InvalidId`](crate::StoreError::InvalidId), an unknown one
/// with [`StoreError::NotFound`](crate::StoreError::NotFound). Each call is
/// atomic on its own; nothing is atomic across calls.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// All users, in no particular order.
    async fn find_all_users(&self) -> Result<Vec<User>>;

    async fn find_user(&self, id: &str) -> Result<User>;

    /// Create a user with an empty product list.
    async fn create_user(&self, fields: NewUser) -> Result<User>;

    /// Merge `patch` into the stored user and return the merged record.
    async fn update_user(&self, id: &str, patch: UserPatch) -> Result<User>;

    /// All products, in no particular order.
    async fn find_all_products(&self) -> Result<Vec<Product>>;

    async fn find_product(&self, id: &str) -> Result<Product>;

    /// Products matching any of `ids`, in no particular order. Ids without a
    /// stored product are skipped; each match appears once.
    async fn find_products(&self, ids: &[ProductId]) -> Result<Vec<Product>>;

    async fn create_product(&self, fields: NewProduct) -> Result<Product>;

    /// Release the backend's resources (the Neo4j connection pool, the
    /// in-memory collections). Every later call fails with
    /// `StoreError::Closed`. Closing twice is a no-op.
    async fn close(&self) -> Result<()>;
}

/// Open the configured backend.
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn EntityStore>> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::info!("Opened in-memory entity store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Neo4j => {
            let store = Neo4jStore::connect(&config.neo4j).await?;
            Ok(Arc::new(store))
        }
    }
}
