//! In-memory entity store.
//!
//! Each collection sits behind its own `RwLock`; a call holds the lock for its
//! whole duration, which gives the same per-call atomicity a document store
//! gives per document.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use catalog_core::{NewProduct, NewUser, Product, ProductId, User, UserId, UserPatch};

use crate::error::{Collection, Result, StoreError};
use crate::store::EntityStore;

#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<UserId, User>>,
    products: RwLock<HashMap<ProductId, Product>>,
    closed: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn find_all_users(&self) -> Result<Vec<User>> {
        self.ensure_open()?;
        let users = self.users.read().await;
        Ok(users.values().cloned().collect())
    }

    async fn find_user(&self, id: &str) -> Result<User> {
        self.ensure_open()?;
        let user_id = UserId::parse(id)?;
        let users = self.users.read().await;
        users.get(&user_id).cloned().ok_or_else(|| StoreError::NotFound {
            collection: Collection::User,
            id: user_id.to_string(),
        })
    }

    async fn create_user(&self, fields: NewUser) -> Result<User> {
        self.ensure_open()?;
        fields.validate()?;
        let user = fields.into_user(UserId::new());
        let mut users = self.users.write().await;
        users.insert(user.id, user.clone());
        tracing::debug!(user_id = %user.id, "Inserted user");
        Ok(user)
    }

    async fn update_user(&self, id: &str, patch: UserPatch) -> Result<User> {
        self.ensure_open()?;
        let user_id = UserId::parse(id)?;
        let mut users = self.users.write().await;
        let user = users.get_mut(&user_id).ok_or_else(|| StoreError::NotFound {
            collection: Collection::User,
            id: user_id.to_string(),
        })?;
        patch.validate()?;
        patch.apply(user);
        Ok(user.clone())
    }

    async fn find_all_products(&self) -> Result<Vec<Product>> {
        self.ensure_open()?;
        let products = self.products.read().await;
        Ok(products.values().cloned().collect())
    }

    async fn find_product(&self, id: &str) -> Result<Product> {
        self.ensure_open()?;
        let product_id = ProductId::parse(id)?;
        let products = self.products.read().await;
        products
            .get(&product_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                collection: Collection::Product,
                id: product_id.to_string(),
            })
    }

    async fn find_products(&self, ids: &[ProductId]) -> Result<Vec<Product>> {
        self.ensure_open()?;
        let wanted: HashSet<&ProductId> = ids.iter().collect();
        let products = self.products.read().await;
        Ok(wanted
            .into_iter()
            .filter_map(|id| products.get(id).cloned())
            .collect())
    }

    async fn create_product(&self, fields: NewProduct) -> Result<Product> {
        self.ensure_open()?;
        let product = fields.into_product(ProductId::new());
        let mut products = self.products.write().await;
        products.insert(product.id, product.clone());
        tracing::debug!(product_id = %product.id, "Inserted product");
        Ok(product)
    }

    async fn close(&self) -> Result<()> {
        if !self.closed.swap(true, Ordering::AcqRel) {
            self.users.write().await.clear();
            self.products.write().await.clear();
            tracing::info!("Closed in-memory entity store");
        }
        Ok(())
    }
}
