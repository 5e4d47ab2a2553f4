//! Core domain types for the catalog: users and the products they own.
//!
//! A user's `products` list holds weak references. It names products by id
//! without owning them, and may name the same product twice.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CatalogError;

// ── Identifiers ───────────────────────────────────────────────────

/// Store-assigned identifier of a user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier received from a caller.
    pub fn parse(raw: &str) -> Result<Self, CatalogError> {
        parse_uuid(raw).map(Self)
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Store-assigned identifier of a product.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ProductId(pub Uuid);

impl ProductId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier received from a caller.
    pub fn parse(raw: &str) -> Result<Self, CatalogError> {
        parse_uuid(raw).map(Self)
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

fn parse_uuid(raw: &str) -> Result<Uuid, CatalogError> {
    Uuid::parse_str(raw.trim()).map_err(|_| CatalogError::InvalidId(raw.to_string()))
}

// ── Entities ──────────────────────────────────────────────────────

/// A stored user record. `products` keeps ownership order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub age: i32,
    pub products: Vec<ProductId>,
}

/// A stored product record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub title: Option<String>,
    pub price: Option<i32>,
}

/// A user with its product references resolved into product records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserView {
    pub id: UserId,
    pub name: String,
    pub age: i32,
    pub products: Vec<Product>,
}

// ── Inputs ────────────────────────────────────────────────────────

/// Fields for creating a user. New users start with no products.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub age: i32,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), CatalogError> {
        validate_name(&self.name)?;
        validate_age(self.age)
    }

    /// Build the stored record under a fresh identifier.
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            name: self.name,
            age: self.age,
            products: Vec::new(),
        }
    }
}

/// Fields for creating a product. Both are optional on the record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewProduct {
    pub title: Option<String>,
    pub price: Option<i32>,
}

impl NewProduct {
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            title: self.title,
            price: self.price,
        }
    }
}

/// A partial update of a user. `None` leaves the stored field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub products: Option<Vec<ProductId>>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none() && self.products.is_none()
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(age) = self.age {
            validate_age(age)?;
        }
        Ok(())
    }

    /// Merge the provided fields into `user`.
    pub fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(age) = self.age {
            user.age = age;
        }
        if let Some(products) = self.products {
            user.products = products;
        }
    }
}

fn validate_name(name: &str) -> Result<(), CatalogError> {
    if name.trim().is_empty() {
        return Err(CatalogError::Validation(
            "User.name is required and must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_age(age: i32) -> Result<(), CatalogError> {
    if age < 0 {
        return Err(CatalogError::Validation(format!(
            "User.age must be non-negative, got {age}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_parse_accepts_uuid() {
        let id = UserId::new();
        let parsed = UserId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn id_parse_rejects_malformed() {
        let err = ProductId::parse("doesnotexist").unwrap_err();
        assert_eq!(err, CatalogError::InvalidId("doesnotexist".to_string()));
    }

    #[test]
    fn new_user_validation() {
        let ok = NewUser {
            name: "Alice".to_string(),
            age: 30,
        };
        assert!(ok.validate().is_ok());

        let blank = NewUser {
            name: "   ".to_string(),
            age: 30,
        };
        assert!(matches!(blank.validate(), Err(CatalogError::Validation(_))));

        let negative = NewUser {
            name: "Bob".to_string(),
            age: -1,
        };
        assert!(matches!(
            negative.validate(),
            Err(CatalogError::Validation(_))
        ));
    }

    #[test]
    fn patch_merges_only_provided_fields() {
        let mut user = NewUser {
            name: "Alice".to_string(),
            age: 30,
        }
        .into_user(UserId::new());

        UserPatch {
            name: Some("X".to_string()),
            ..Default::default()
        }
        .apply(&mut user);

        assert_eq!(user.name, "X");
        assert_eq!(user.age, 30);
        assert!(user.products.is_empty());
    }

    #[test]
    fn product_serializes_nulls() {
        let product = NewProduct::default().into_product(ProductId::new());
        let json = serde_json::to_value(&product).unwrap();
        assert!(json["title"].is_null());
        assert!(json["price"].is_null());
        assert_eq!(json["id"], serde_json::json!(product.id.to_string()));
    }
}
