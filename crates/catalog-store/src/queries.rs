//! Read operations against the Neo4j document nodes.

use neo4rs::query;

use catalog_core::{Product, ProductId, User, UserId};

use crate::client::Neo4jStore;
use crate::error::{Collection, Result, StoreError};

impl Neo4jStore {
    // ── Single Record Lookups ────────────────────────────────────

    /// Get a user by id.
    pub async fn get_user(&self, id: &str) -> Result<User> {
        let user_id = UserId::parse(id)?;
        let node = self
            .get_node(Collection::User, &user_id.to_string())
            .await?;
        node_to_user(&node)
    }

    /// Get a product by id.
    pub async fn get_product(&self, id: &str) -> Result<Product> {
        let product_id = ProductId::parse(id)?;
        let node = self
            .get_node(Collection::Product, &product_id.to_string())
            .await?;
        node_to_product(&node)
    }

    async fn get_node(&self, collection: Collection, id: &str) -> Result<neo4rs::Node> {
        let label = collection.label();
        let cypher = format!(
            "MATCH (n:{label} {{id: $id}})
             RETURN n"
        );

        let q = query(&cypher).param("id", id.to_string());

        match self.query_one(q).await? {
            Some(row) => row.get::<neo4rs::Node>("n").map_err(|e| {
                StoreError::Serialization(format!("Failed to deserialize {label} node: {e}"))
            }),
            None => Err(StoreError::NotFound {
                collection,
                id: id.to_string(),
            }),
        }
    }

    // ── List Queries ─────────────────────────────────────────────

    /// List every user node.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        let nodes = self.list_nodes(Collection::User).await?;
        nodes.iter().map(node_to_user).collect()
    }

    /// List every product node.
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        let nodes = self.list_nodes(Collection::Product).await?;
        nodes.iter().map(node_to_product).collect()
    }

    async fn list_nodes(&self, collection: Collection) -> Result<Vec<neo4rs::Node>> {
        let label = collection.label();
        let cypher = format!("MATCH (n:{label}) RETURN n");

        let rows = self.query_rows(query(&cypher)).await?;
        let mut nodes = Vec::with_capacity(rows.len());
        for row in rows {
            let node: neo4rs::Node = row.get("n").map_err(|e| {
                StoreError::Serialization(format!("Failed to deserialize {label} node: {e}"))
            })?;
            nodes.push(node);
        }
        Ok(nodes)
    }

    /// Fetch the products named by `ids`; unknown ids are skipped.
    pub async fn get_products(&self, ids: &[ProductId]) -> Result<Vec<Product>> {
        let mut wanted: Vec<String> = ids.iter().map(ToString::to_string).collect();
        wanted.sort();
        wanted.dedup();

        let q = query(
            "MATCH (n:Product)
             WHERE n.id IN $ids
             RETURN n",
        )
        .param("ids", wanted);

        let rows = self.query_rows(q).await?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let node: neo4rs::Node = row.get("n").map_err(|e| {
                StoreError::Serialization(format!("Failed to deserialize Product node: {e}"))
            })?;
            results.push(node_to_product(&node)?);
        }
        Ok(results)
    }
}

// ── Node Conversion ──────────────────────────────────────────────

pub(crate) fn node_to_user(node: &neo4rs::Node) -> Result<User> {
    let id: String = required(node, "id", "User.id")?;
    let name: String = required(node, "name", "User.name")?;
    let age: i64 = required(node, "age", "User.age")?;
    let products: Vec<String> = required(node, "products", "User.products")?;

    if name.trim().is_empty() {
        return Err(corrupt("User.name", &name));
    }

    let products = products
        .iter()
        .map(|raw| ProductId::parse(raw).map_err(|_| corrupt("User.products", raw)))
        .collect::<Result<Vec<_>>>()?;

    Ok(User {
        id: UserId::parse(&id).map_err(|_| corrupt("User.id", &id))?,
        name,
        age: i32::try_from(age).map_err(|_| corrupt("User.age", &age.to_string()))?,
        products,
    })
}

pub(crate) fn node_to_product(node: &neo4rs::Node) -> Result<Product> {
    let id: String = required(node, "id", "Product.id")?;
    let title: Option<String> = optional(node, "title", "Product.title")?;
    let price = match optional::<i64>(node, "price", "Product.price")? {
        Some(p) => Some(i32::try_from(p).map_err(|_| corrupt("Product.price", &p.to_string()))?),
        None => None,
    };

    Ok(Product {
        id: ProductId::parse(&id).map_err(|_| corrupt("Product.id", &id))?,
        title,
        price,
    })
}

/// A property every node of the label must carry with the expected type.
fn required<T>(node: &neo4rs::Node, key: &str, field: &str) -> Result<T>
where
    T: for<'de> serde::Deserialize<'de>,
{
    optional(node, key, field)?.ok_or_else(|| {
        StoreError::Serialization(format!("Stored {field} is missing"))
    })
}

/// A property that may be absent, but must have the expected type when set.
fn optional<T>(node: &neo4rs::Node, key: &str, field: &str) -> Result<Option<T>>
where
    T: for<'de> serde::Deserialize<'de>,
{
    if !node.keys().contains(&key) {
        return Ok(None);
    }
    node.get::<T>(key)
        .map(Some)
        .map_err(|e| StoreError::Serialization(format!("Stored {field} is unreadable: {e}")))
}

fn corrupt(field: &str, value: &str) -> StoreError {
    StoreError::Serialization(format!("Stored {field} has unexpected value {value:?}"))
}
