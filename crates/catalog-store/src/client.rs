//! Neo4j connection management and the Neo4j-backed entity store.
//!
//! Users and products are stored as standalone document nodes. A user's
//! product references live in its `products` list property, never as
//! relationships, so the store never joins on its own.

use async_trait::async_trait;
use neo4rs::{ConfigBuilder, Graph, Query};
use tokio::sync::RwLock;

use catalog_core::config::Neo4jConfig;
use catalog_core::{NewProduct, NewUser, Product, ProductId, User, UserPatch};

use crate::error::{Result, StoreError};
use crate::store::EntityStore;

/// Thread-safe Neo4j store with connection pooling.
///
/// Opened once at process start and shared behind an `Arc`. Closing drops
/// the pool even while other handles to the store remain.
pub struct Neo4jStore {
    graph: RwLock<Option<Graph>>,
}

impl Neo4jStore {
    /// Connect to Neo4j with the given configuration.
    pub async fn connect(config: &Neo4jConfig) -> Result<Self> {
        let neo_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .max_connections(config.max_connections as usize)
            .fetch_size(config.fetch_size)
            .build()
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        tracing::info!(uri = %config.uri, "Connected to Neo4j");
        Ok(Self {
            graph: RwLock::new(Some(graph)),
        })
    }

    /// A handle to the pool, or `Closed` once the store has been closed.
    async fn graph(&self) -> Result<Graph> {
        self.graph.read().await.clone().ok_or(StoreError::Closed)
    }

    /// Execute a write-only query (CREATE, SET, DELETE).
    pub async fn run(&self, query: Query) -> Result<()> {
        self.graph().await?.run(query).await?;
        Ok(())
    }

    /// Execute a read query and collect all rows.
    pub async fn query_rows(&self, query: Query) -> Result<Vec<neo4rs::Row>> {
        let mut stream = self.graph().await?.execute(query).await?;
        let mut rows = Vec::new();
        while let Some(row) = stream.next().await? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Execute a read query and return the first row, if any.
    pub async fn query_one(&self, query: Query) -> Result<Option<neo4rs::Row>> {
        let mut stream = self.graph().await?.execute(query).await?;
        Ok(stream.next().await?)
    }
}

#[async_trait]
impl EntityStore for Neo4jStore {
    async fn find_all_users(&self) -> Result<Vec<User>> {
        self.list_users().await
    }

    async fn find_user(&self, id: &str) -> Result<User> {
        self.get_user(id).await
    }

    async fn create_user(&self, fields: NewUser) -> Result<User> {
        self.insert_user(fields).await
    }

    async fn update_user(&self, id: &str, patch: UserPatch) -> Result<User> {
        self.patch_user(id, patch).await
    }

    async fn find_all_products(&self) -> Result<Vec<Product>> {
        self.list_products().await
    }

    async fn find_product(&self, id: &str) -> Result<Product> {
        self.get_product(id).await
    }

    async fn find_products(&self, ids: &[ProductId]) -> Result<Vec<Product>> {
        self.get_products(ids).await
    }

    async fn create_product(&self, fields: NewProduct) -> Result<Product> {
        self.insert_product(fields).await
    }

    async fn close(&self) -> Result<()> {
        if self.graph.write().await.take().is_some() {
            tracing::info!("Closed Neo4j entity store");
        }
        Ok(())
    }
}
