//! One resolver per declared operation.
//!
//! Resolvers translate validated arguments into entity store calls and shape
//! the outcome to the operation's declared return type. Store failures pass
//! through unchanged, except that the nullable point lookups (`user`,
//! `product`) turn NotFound into `None`.

use std::sync::Arc;

use futures::future::try_join_all;

use catalog_core::{NewProduct, NewUser, Product, UserPatch, UserView};
use catalog_store::{populate, EntityStore, StoreError};

use crate::error::{QueryError, Result};

/// The resolver layer, holding the injected store handle.
#[derive(Clone)]
pub struct Resolvers {
    store: Arc<dyn EntityStore>,
}

impl Resolvers {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn EntityStore {
        self.store.as_ref()
    }

    // ── Queries ──────────────────────────────────────────────────

    /// Every user with its products populated.
    pub async fn users(&self) -> Result<Vec<UserView>> {
        tracing::debug!("Resolving users");
        let users = self.store.find_all_users().await?;
        let views = try_join_all(users.into_iter().map(|u| populate(self.store(), u))).await?;
        Ok(views)
    }

    pub async fn user(&self, id: &str) -> Result<Option<UserView>> {
        tracing::debug!(user_id = id, "Resolving user");
        match not_found_as_none(self.store.find_user(id).await)? {
            Some(user) => Ok(Some(populate(self.store(), user).await?)),
            None => Ok(None),
        }
    }

    pub async fn products(&self) -> Result<Vec<Product>> {
        tracing::debug!("Resolving products");
        Ok(self.store.find_all_products().await?)
    }

    pub async fn product(&self, id: &str) -> Result<Option<Product>> {
        tracing::debug!(product_id = id, "Resolving product");
        Ok(not_found_as_none(self.store.find_product(id).await)?)
    }

    // ── Mutations ────────────────────────────────────────────────

    pub async fn add_user(&self, name: String, age: i32) -> Result<UserView> {
        let user = self.store.create_user(NewUser { name, age }).await?;
        tracing::info!(user_id = %user.id, "Added user");
        Ok(populate(self.store(), user).await?)
    }

    /// Merge the provided fields into an existing user. An unknown id is an
    /// error here, not `None`.
    pub async fn update_user(
        &self,
        id: &str,
        name: Option<String>,
        age: Option<i32>,
    ) -> Result<UserView> {
        let patch = UserPatch {
            name,
            age,
            products: None,
        };
        let user = self.store.update_user(id, patch).await?;
        tracing::info!(user_id = %user.id, "Updated user");
        Ok(populate(self.store(), user).await?)
    }

    /// Create a product and, when `user_id` is given, append it to that
    /// user's products.
    ///
    /// The two steps are not atomic and the product is not rolled back when
    /// linking fails: the error is [`QueryError::PartialMutation`] carrying
    /// the created product.
    pub async fn add_product(
        &self,
        title: String,
        price: i32,
        user_id: Option<&str>,
    ) -> Result<Product> {
        let product = self
            .store
            .create_product(NewProduct {
                title: Some(title),
                price: Some(price),
            })
            .await?;
        tracing::info!(product_id = %product.id, "Added product");

        let Some(user_id) = user_id else {
            return Ok(product);
        };

        match self.link_product(user_id, &product).await {
            Ok(()) => Ok(product),
            Err(err) => {
                tracing::warn!(
                    product_id = %product.id,
                    user_id,
                    error = %err,
                    "Product created but not linked to user"
                );
                Err(QueryError::PartialMutation {
                    operation: "addProduct".to_string(),
                    message: format!(
                        "created product {} but could not link it to user {user_id}",
                        product.id
                    ),
                    partial: serde_json::to_value(&product)?,
                    source: Box::new(err.into()),
                })
            }
        }
    }

    /// Read-append-write of the owner's product list. Concurrent links to the
    /// same user are last-write-wins.
    async fn link_product(
        &self,
        user_id: &str,
        product: &Product,
    ) -> std::result::Result<(), StoreError> {
        let user = self.store.find_user(user_id).await?;
        let mut products = user.products;
        products.push(product.id);

        let patch = UserPatch {
            products: Some(products),
            ..Default::default()
        };
        self.store.update_user(&user.id.to_string(), patch).await?;
        tracing::info!(product_id = %product.id, user_id = %user.id, "Linked product to user");
        Ok(())
    }
}

fn not_found_as_none<T>(result: std::result::Result<T, StoreError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e.into()),
    }
}
