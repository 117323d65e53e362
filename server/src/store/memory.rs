//! In-process store with the same semantics as the PostgreSQL backend.

use super::{op_span, RecipeFilter, ReviewFilter, Store, StoreError};
use crate::models::{
    Category, CategoryChanges, NewCategory, NewRecipe, NewReview, Recipe, RecipeChanges, Review,
    ReviewChanges,
};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

#[derive(Debug, Default)]
struct Tables {
    // Vecs keep insertion order
    categories: Vec<Category>,
    recipes: Vec<Recipe>,
    reviews: Vec<Review>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

fn name_taken(categories: &[Category], name: &str, except: Option<Uuid>) -> bool {
    let name = name.to_lowercase();
    categories
        .iter()
        .any(|c| Some(c.id) != except && c.name.to_lowercase() == name)
}

fn duplicate_name() -> StoreError {
    StoreError::DuplicateKey {
        entity: "Category",
        field: "name",
    }
}

fn position<T>(
    items: &[T],
    id: Uuid,
    id_of: fn(&T) -> Uuid,
    entity: &'static str,
) -> Result<usize, StoreError> {
    items
        .iter()
        .position(|item| id_of(item) == id)
        .ok_or(StoreError::NotFound { entity })
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_category(&self, new: NewCategory) -> Result<Category, StoreError> {
        op_span("create_category").in_scope(|| {
            let mut tables = self.write()?;
            if name_taken(&tables.categories, &new.name, None) {
                return Err(duplicate_name());
            }

            let category = Category {
                id: Uuid::new_v4(),
                name: new.name,
                description: new.description,
                created_at: Utc::now(),
            };
            tables.categories.push(category.clone());
            Ok(category)
        })
    }

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>, StoreError> {
        op_span("get_category").in_scope(|| {
            let tables = self.read()?;
            Ok(tables.categories.iter().find(|c| c.id == id).cloned())
        })
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        op_span("list_categories").in_scope(|| Ok(self.read()?.categories.clone()))
    }

    async fn update_category(
        &self,
        id: Uuid,
        changes: CategoryChanges,
    ) -> Result<Category, StoreError> {
        op_span("update_category").in_scope(|| {
            let mut tables = self.write()?;
            let index = position(&tables.categories, id, |c| c.id, "Category")?;

            if let Some(name) = &changes.name {
                if name_taken(&tables.categories, name, Some(id)) {
                    return Err(duplicate_name());
                }
            }

            let category = &mut tables.categories[index];
            changes.apply(category);
            Ok(category.clone())
        })
    }

    async fn delete_category(&self, id: Uuid) -> Result<(), StoreError> {
        op_span("delete_category").in_scope(|| {
            let mut tables = self.write()?;
            let index = position(&tables.categories, id, |c| c.id, "Category")?;
            tables.categories.remove(index);
            Ok(())
        })
    }

    async fn create_recipe(&self, new: NewRecipe) -> Result<Recipe, StoreError> {
        op_span("create_recipe").in_scope(|| {
            let recipe = Recipe {
                id: Uuid::new_v4(),
                title: new.title,
                category_id: new.category_id,
                ingredients: new.ingredients,
                instructions: new.instructions,
                prep_time: new.prep_time,
                cook_time: new.cook_time,
                difficulty: new.difficulty,
                created_at: Utc::now(),
            };
            self.write()?.recipes.push(recipe.clone());
            Ok(recipe)
        })
    }

    async fn get_recipe(&self, id: Uuid) -> Result<Option<Recipe>, StoreError> {
        op_span("get_recipe").in_scope(|| {
            let tables = self.read()?;
            Ok(tables.recipes.iter().find(|r| r.id == id).cloned())
        })
    }

    async fn list_recipes(&self, filter: RecipeFilter) -> Result<Vec<Recipe>, StoreError> {
        op_span("list_recipes").in_scope(|| {
            let tables = self.read()?;
            Ok(tables
                .recipes
                .iter()
                .filter(|r| filter.category_id.is_none() || r.category_id == filter.category_id)
                .cloned()
                .collect())
        })
    }

    async fn update_recipe(&self, id: Uuid, changes: RecipeChanges) -> Result<Recipe, StoreError> {
        op_span("update_recipe").in_scope(|| {
            let mut tables = self.write()?;
            let index = position(&tables.recipes, id, |r| r.id, "Recipe")?;
            let recipe = &mut tables.recipes[index];
            changes.apply(recipe);
            Ok(recipe.clone())
        })
    }

    async fn delete_recipe(&self, id: Uuid) -> Result<(), StoreError> {
        op_span("delete_recipe").in_scope(|| {
            let mut tables = self.write()?;
            let index = position(&tables.recipes, id, |r| r.id, "Recipe")?;
            tables.recipes.remove(index);
            Ok(())
        })
    }

    async fn create_review(&self, new: NewReview) -> Result<Review, StoreError> {
        op_span("create_review").in_scope(|| {
            let review = Review {
                id: Uuid::new_v4(),
                recipe_id: new.recipe_id,
                rating: new.rating,
                comment: new.comment,
                user_name: new.user_name,
                created_at: Utc::now(),
            };
            self.write()?.reviews.push(review.clone());
            Ok(review)
        })
    }

    async fn get_review(&self, id: Uuid) -> Result<Option<Review>, StoreError> {
        op_span("get_review").in_scope(|| {
            let tables = self.read()?;
            Ok(tables.reviews.iter().find(|r| r.id == id).cloned())
        })
    }

    async fn list_reviews(&self, filter: ReviewFilter) -> Result<Vec<Review>, StoreError> {
        op_span("list_reviews").in_scope(|| {
            let tables = self.read()?;
            let Some(recipe_id) = filter.recipe_id else {
                return Ok(tables.reviews.clone());
            };

            // Newest first; reversing before the stable sort keeps later
            // inserts ahead when timestamps tie.
            let mut reviews: Vec<Review> = tables
                .reviews
                .iter()
                .rev()
                .filter(|r| r.recipe_id == recipe_id)
                .cloned()
                .collect();
            reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(reviews)
        })
    }

    async fn update_review(&self, id: Uuid, changes: ReviewChanges) -> Result<Review, StoreError> {
        op_span("update_review").in_scope(|| {
            let mut tables = self.write()?;
            let index = position(&tables.reviews, id, |r| r.id, "Review")?;
            let review = &mut tables.reviews[index];
            changes.apply(review);
            Ok(review.clone())
        })
    }

    async fn delete_review(&self, id: Uuid) -> Result<(), StoreError> {
        op_span("delete_review").in_scope(|| {
            let mut tables = self.write()?;
            let index = position(&tables.reviews, id, |r| r.id, "Review")?;
            tables.reviews.remove(index);
            Ok(())
        })
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, Ingredient, Unit};

    fn breakfast() -> NewCategory {
        NewCategory {
            name: "Breakfast".to_string(),
            description: "Morning meals and more".to_string(),
        }
    }

    fn pancakes() -> NewRecipe {
        NewRecipe {
            title: "Pancakes".to_string(),
            category_id: None,
            ingredients: vec![Ingredient {
                name: "flour".to_string(),
                amount: "2".to_string(),
                unit: Unit::Cups,
            }],
            instructions: vec!["Mix dry ingredients".to_string()],
            prep_time: 5,
            cook_time: 10,
            difficulty: Difficulty::Easy,
        }
    }

    fn review_for(recipe_id: Uuid, comment: &str) -> NewReview {
        NewReview {
            recipe_id,
            rating: 4,
            comment: comment.to_string(),
            user_name: "ChefJohn".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_then_get_category() {
        let store = MemoryStore::new();
        let created = store.create_category(breakfast()).await.unwrap();

        let fetched = store.get_category(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.name, "Breakfast");
        assert_eq!(fetched.description, "Morning meals and more");
    }

    #[tokio::test]
    async fn test_category_names_unique_ignoring_case() {
        let store = MemoryStore::new();
        store.create_category(breakfast()).await.unwrap();

        let err = store
            .create_category(NewCategory {
                name: "BREAKFAST".to_string(),
                description: "Shouting about mornings".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey { field: "name", .. }));
        assert_eq!(store.list_categories().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rename_to_own_name_in_other_case_is_allowed() {
        let store = MemoryStore::new();
        let category = store.create_category(breakfast()).await.unwrap();
        let other = store
            .create_category(NewCategory {
                name: "Desserts".to_string(),
                description: "Sweet treats for later".to_string(),
            })
            .await
            .unwrap();

        let renamed = store
            .update_category(
                category.id,
                CategoryChanges {
                    name: Some("breakfast".to_string()),
                    description: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "breakfast");
        assert_eq!(renamed.created_at, category.created_at);

        let err = store
            .update_category(
                other.id,
                CategoryChanges {
                    name: Some("Breakfast".to_string()),
                    description: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey { .. }));
    }

    #[tokio::test]
    async fn test_missing_entities() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();

        assert!(store.get_recipe(id).await.unwrap().is_none());
        assert!(matches!(
            store.update_recipe(id, RecipeChanges::default()).await,
            Err(StoreError::NotFound { entity: "Recipe" })
        ));
        assert!(matches!(
            store.delete_review(id).await,
            Err(StoreError::NotFound { entity: "Review" })
        ));
    }

    #[tokio::test]
    async fn test_recipe_filter_by_category() {
        let store = MemoryStore::new();
        let category = store.create_category(breakfast()).await.unwrap();

        let filed = store
            .create_recipe(NewRecipe {
                category_id: Some(category.id),
                ..pancakes()
            })
            .await
            .unwrap();
        store.create_recipe(pancakes()).await.unwrap();

        let all = store.list_recipes(RecipeFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, filed.id);

        let filtered = store
            .list_recipes(RecipeFilter {
                category_id: Some(category.id),
            })
            .await
            .unwrap();
        assert_eq!(filtered, vec![filed]);
    }

    #[tokio::test]
    async fn test_reviews_filtered_newest_first() {
        let store = MemoryStore::new();
        let recipe = store.create_recipe(pancakes()).await.unwrap();
        let other = store.create_recipe(pancakes()).await.unwrap();

        let first = store.create_review(review_for(recipe.id, "First!")).await.unwrap();
        store.create_review(review_for(other.id, "Elsewhere")).await.unwrap();
        let second = store.create_review(review_for(recipe.id, "Second")).await.unwrap();

        let filtered = store
            .list_reviews(ReviewFilter {
                recipe_id: Some(recipe.id),
            })
            .await
            .unwrap();
        let ids: Vec<Uuid> = filtered.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);

        let all = store.list_reviews(ReviewFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id, first.id);
    }

    #[tokio::test]
    async fn test_deleting_recipe_keeps_reviews() {
        let store = MemoryStore::new();
        let recipe = store.create_recipe(pancakes()).await.unwrap();
        let review = store.create_review(review_for(recipe.id, "Lovely")).await.unwrap();

        store.delete_recipe(recipe.id).await.unwrap();

        assert!(store.get_recipe(recipe.id).await.unwrap().is_none());
        assert_eq!(store.get_review(review.id).await.unwrap(), Some(review));
    }

    #[tokio::test]
    async fn test_update_review_keeps_created_at() {
        let store = MemoryStore::new();
        let review = store
            .create_review(review_for(Uuid::new_v4(), "Pretty good"))
            .await
            .unwrap();

        let updated = store
            .update_review(
                review.id,
                ReviewChanges {
                    rating: Some(1),
                    comment: Some("Changed my mind".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.rating, 1);
        assert_eq!(updated.comment, "Changed my mind");
        assert_eq!(updated.created_at, review.created_at);
        assert_eq!(updated.user_name, review.user_name);
    }
}
