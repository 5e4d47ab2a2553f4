//! Resolve a user's product references into product records.
//!
//! Population is two explicit fetches: the user record (already in hand) and
//! the set of products it names. Product records are then laid out in the
//! user's reference order. A reference to a product that no longer exists is
//! omitted from the result.

use std::collections::HashMap;

use catalog_core::{Product, ProductId, User, UserView};

use crate::error::Result;
use crate::store::EntityStore;

/// Expand `user.products` into the referenced product records.
pub async fn populate(store: &dyn EntityStore, user: User) -> Result<UserView> {
    let products = if user.products.is_empty() {
        Vec::new()
    } else {
        let fetched = store.find_products(&user.products).await?;
        arrange(&user, fetched)
    };

    Ok(UserView {
        id: user.id,
        name: user.name,
        age: user.age,
        products,
    })
}

/// Lay out fetched products in the user's reference order, keeping
/// duplicate references and dropping dangling ones.
fn arrange(user: &User, fetched: Vec<Product>) -> Vec<Product> {
    let by_id: HashMap<ProductId, Product> = fetched.into_iter().map(|p| (p.id, p)).collect();

    let mut ordered = Vec::with_capacity(user.products.len());
    for product_id in &user.products {
        match by_id.get(product_id) {
            Some(product) => ordered.push(product.clone()),
            None => tracing::warn!(
                user_id = %user.id,
                product_id = %product_id,
                "Dropping reference to missing product"
            ),
        }
    }
    ordered
}
