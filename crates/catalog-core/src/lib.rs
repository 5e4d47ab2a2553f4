//! catalog-core: Shared types, configuration, and error handling for the catalog graph service.
//!
//! This crate provides the foundational types used across all catalog components:
//! - Entity types (User, Product) and their store-assigned identifiers
//! - Creation inputs and partial-update patches
//! - The error taxonomy surfaced to callers
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::CatalogConfig;
pub use error::{CatalogError, ErrorKind};
pub use types::{NewProduct, NewUser, Product, ProductId, User, UserId, UserPatch, UserView};
