//! Write operations against the Neo4j document nodes.
//!
//! Records are created with CREATE under a freshly generated id. Updates
//! SET only the properties present in the patch, in a single statement, so
//! one update is atomic per node and concurrent updates are last-write-wins.

use neo4rs::query;

use catalog_core::{NewProduct, NewUser, Product, ProductId, User, UserId, UserPatch};

use crate::client::Neo4jStore;
use crate::error::{Collection, Result, StoreError};
use crate::queries::node_to_user;

impl Neo4jStore {
    // ── Creates ──────────────────────────────────────────────────

    /// Create a User node with an empty product list.
    pub async fn insert_user(&self, fields: NewUser) -> Result<User> {
        fields.validate()?;
        let user = fields.into_user(UserId::new());

        let q = query(
            "CREATE (n:User {id: $id, name: $name, age: $age, products: $products})",
        )
        .param("id", user.id.to_string())
        .param("name", user.name.clone())
        .param("age", i64::from(user.age))
        .param("products", Vec::<String>::new());

        self.run(q).await?;
        tracing::debug!(user_id = %user.id, "Created User node");
        Ok(user)
    }

    /// Create a Product node. Absent fields are not stored at all.
    pub async fn insert_product(&self, fields: NewProduct) -> Result<Product> {
        let product = fields.into_product(ProductId::new());

        let mut props = vec!["id: $id"];
        if product.title.is_some() {
            props.push("title: $title");
        }
        if product.price.is_some() {
            props.push("price: $price");
        }
        let cypher = format!("CREATE (n:Product {{{}}})", props.join(", "));

        let mut q = query(&cypher).param("id", product.id.to_string());
        if let Some(title) = &product.title {
            q = q.param("title", title.clone());
        }
        if let Some(price) = product.price {
            q = q.param("price", i64::from(price));
        }

        self.run(q).await?;
        tracing::debug!(product_id = %product.id, "Created Product node");
        Ok(product)
    }

    // ── Updates ──────────────────────────────────────────────────

    /// Merge the provided fields into a User node and return the result.
    pub async fn patch_user(&self, id: &str, patch: UserPatch) -> Result<User> {
        let user_id = UserId::parse(id)?;
        if let Err(err) = patch.validate() {
            // An unknown id reports NotFound before any field problem.
            self.get_user(id).await?;
            return Err(err.into());
        }

        let mut sets = Vec::new();
        if patch.name.is_some() {
            sets.push("n.name = $name");
        }
        if patch.age.is_some() {
            sets.push("n.age = $age");
        }
        if patch.products.is_some() {
            sets.push("n.products = $products");
        }

        let cypher = if sets.is_empty() {
            "MATCH (n:User {id: $id}) RETURN n".to_string()
        } else {
            format!(
                "MATCH (n:User {{id: $id}})
                 SET {}
                 RETURN n",
                sets.join(", ")
            )
        };

        let mut q = query(&cypher).param("id", user_id.to_string());
        if let Some(name) = patch.name {
            q = q.param("name", name);
        }
        if let Some(age) = patch.age {
            q = q.param("age", i64::from(age));
        }
        if let Some(products) = patch.products {
            let ids: Vec<String> = products.iter().map(ToString::to_string).collect();
            q = q.param("products", ids);
        }

        match self.query_one(q).await? {
            Some(row) => {
                let node: neo4rs::Node = row.get("n").map_err(|e| {
                    StoreError::Serialization(format!("Failed to deserialize User node: {e}"))
                })?;
                node_to_user(&node)
            }
            None => Err(StoreError::NotFound {
                collection: Collection::User,
                id: user_id.to_string(),
            }),
        }
    }
}
