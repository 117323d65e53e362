//! Persistence gateway for categories, recipes and reviews.
//!
//! Handlers only ever talk to a [`Store`] trait object. Two backends exist:
//! [`PgStore`] (PostgreSQL via diesel, used in production) and [`MemoryStore`]
//! (in-process, used by tests and for local development with
//! `DATABASE_URL=memory:`). Both enforce the same rules: case-insensitive
//! unique category names, insertion-ordered listings, newest-first review
//! filtering, and no cascading deletes.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::models::{
    Category, CategoryChanges, NewCategory, NewRecipe, NewReview, Recipe, RecipeChanges, Review,
    ReviewChanges,
};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Connection strings with this prefix select [`MemoryStore`].
pub const MEMORY_URL_PREFIX: &str = "memory:";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("a {entity} with this {field} already exists")]
    DuplicateKey {
        entity: &'static str,
        field: &'static str,
    },

    #[error("'{0}' is not a valid identifier")]
    InvalidIdentifier(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("stored record could not be decoded: {0}")]
    Corrupt(String),
}

/// Equality filter for recipe listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub category_id: Option<Uuid>,
}

/// Equality filter for review listings. Filtering by recipe sorts newest
/// first; reviews created in the same instant keep a stable order that is up
/// to the backend (by id in postgres, latest insert first in memory).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewFilter {
    pub recipe_id: Option<Uuid>,
}

/// Durable storage for the three entity types.
///
/// `get_*` returns `Ok(None)` for a missing entity; `update_*` and `delete_*`
/// fail with [`StoreError::NotFound`] instead. Identifiers and `created_at` are
/// assigned by the store on create and never change afterwards.
#[async_trait]
pub trait Store: Send + Sync + fmt::Debug {
    async fn create_category(&self, new: NewCategory) -> Result<Category, StoreError>;
    async fn get_category(&self, id: Uuid) -> Result<Option<Category>, StoreError>;
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;
    async fn update_category(
        &self,
        id: Uuid,
        changes: CategoryChanges,
    ) -> Result<Category, StoreError>;
    async fn delete_category(&self, id: Uuid) -> Result<(), StoreError>;

    async fn create_recipe(&self, new: NewRecipe) -> Result<Recipe, StoreError>;
    async fn get_recipe(&self, id: Uuid) -> Result<Option<Recipe>, StoreError>;
    async fn list_recipes(&self, filter: RecipeFilter) -> Result<Vec<Recipe>, StoreError>;
    async fn update_recipe(&self, id: Uuid, changes: RecipeChanges) -> Result<Recipe, StoreError>;
    async fn delete_recipe(&self, id: Uuid) -> Result<(), StoreError>;

    async fn create_review(&self, new: NewReview) -> Result<Review, StoreError>;
    async fn get_review(&self, id: Uuid) -> Result<Option<Review>, StoreError>;
    async fn list_reviews(&self, filter: ReviewFilter) -> Result<Vec<Review>, StoreError>;
    async fn update_review(&self, id: Uuid, changes: ReviewChanges) -> Result<Review, StoreError>;
    async fn delete_review(&self, id: Uuid) -> Result<(), StoreError>;

    /// Backend name for logs (e.g. "postgres", "memory").
    fn backend_name(&self) -> &'static str;
}

/// Open the backend named by `database_url`.
pub fn connect(database_url: &str) -> Result<Arc<dyn Store>, StoreError> {
    if database_url.starts_with(MEMORY_URL_PREFIX) {
        tracing::warn!("Using the in-memory store; data is lost on shutdown");
        return Ok(Arc::new(MemoryStore::new()));
    }

    Ok(Arc::new(PgStore::connect(database_url)?))
}

/// Parse an identifier as it arrives in a path, query string or body.
pub fn parse_id(raw: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(raw.trim()).map_err(|_| StoreError::InvalidIdentifier(raw.to_string()))
}

/// Span wrapped around every store operation; counted per request by
/// [`crate::telemetry::StoreOpCountingLayer`].
pub(crate) fn op_span(op: &'static str) -> tracing::Span {
    tracing::info_span!("store.op", op)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
        assert!(matches!(
            parse_id("12345"),
            Err(StoreError::InvalidIdentifier(raw)) if raw == "12345"
        ));
    }

    #[test]
    fn test_connect_memory() {
        let store = connect("memory:").unwrap();
        assert_eq!(store.backend_name(), "memory");
    }
}
