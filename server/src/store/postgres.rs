//! PostgreSQL backend.
//!
//! Diesel queries run synchronously on a pooled connection, each inside a
//! `store.op` span. Category name uniqueness comes from the unique index on
//! `lower(name)`, so racing creates are settled by the database.

use super::{op_span, RecipeFilter, ReviewFilter, Store, StoreError};
use crate::db::{self, DbError, DbPool};
use crate::models::{
    Category, CategoryChanges, Difficulty, NewCategory, NewRecipe, NewReview, Recipe,
    RecipeChanges, Review, ReviewChanges,
};
use crate::schema::{categories, recipes, reviews};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::{AsSelect, SqlTypeOf};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::fmt;
use uuid::Uuid;

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl fmt::Debug for PgStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.pool.state();
        f.debug_struct("PgStore")
            .field("connections", &state.connections)
            .field("idle_connections", &state.idle_connections)
            .finish()
    }
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

impl PgStore {
    pub fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = db::create_pool(database_url)?;
        Ok(Self { pool })
    }

    fn run<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut PgConnection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        op_span(op).in_scope(|| {
            let mut conn = self
                .pool
                .get()
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;
            f(&mut *conn)
        })
    }
}


type ReviewsQuery = reviews::BoxedQuery<'static, Pg, SqlTypeOf<AsSelect<Review, Pg>>>;

/// Reviews sharing a `created_at` are ordered by id so repeated listings agree.
fn reviews_query(filter: ReviewFilter) -> ReviewsQuery {
    let query = reviews::table.select(Review::as_select()).into_boxed();
    match filter.recipe_id {
        Some(recipe_id) => query
            .filter(reviews::recipe_id.eq(recipe_id))
            .order((reviews::created_at.desc(), reviews::id.desc())),
        None => query.order((reviews::created_at.asc(), reviews::id.asc())),
    }
}

fn read_error(err: DieselError) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

fn write_error(err: DieselError, entity: &'static str) -> StoreError {
    match err {
        DieselError::NotFound => StoreError::NotFound { entity },
        // The only unique index is categories(lower(name))
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            StoreError::DuplicateKey {
                entity,
                field: "name",
            }
        }
        other => StoreError::Unavailable(other.to_string()),
    }
}

fn deleted(count: usize, entity: &'static str) -> Result<(), StoreError> {
    if count == 0 {
        Err(StoreError::NotFound { entity })
    } else {
        Ok(())
    }
}

#[derive(Insertable)]
#[diesel(table_name = categories)]
struct CategoryRecord<'a> {
    name: &'a str,
    description: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = categories)]
struct CategoryChangeset<'a> {
    name: Option<&'a str>,
    description: Option<&'a str>,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct RecipeRow {
    id: Uuid,
    title: String,
    category_id: Option<Uuid>,
    ingredients: serde_json::Value,
    instructions: Vec<String>,
    prep_time: i32,
    cook_time: i32,
    difficulty: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<RecipeRow> for Recipe {
    type Error = StoreError;

    fn try_from(row: RecipeRow) -> Result<Self, Self::Error> {
        let ingredients = serde_json::from_value(row.ingredients)
            .map_err(|e| StoreError::Corrupt(format!("recipe {} ingredients: {e}", row.id)))?;
        let difficulty = Difficulty::from_name(&row.difficulty).ok_or_else(|| {
            StoreError::Corrupt(format!(
                "recipe {} difficulty {:?}",
                row.id, row.difficulty
            ))
        })?;

        Ok(Recipe {
            id: row.id,
            title: row.title,
            category_id: row.category_id,
            ingredients,
            instructions: row.instructions,
            prep_time: row.prep_time,
            cook_time: row.cook_time,
            difficulty,
            created_at: row.created_at,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = recipes)]
struct RecipeRecord<'a> {
    title: &'a str,
    category_id: Option<Uuid>,
    ingredients: serde_json::Value,
    instructions: &'a [String],
    prep_time: i32,
    cook_time: i32,
    difficulty: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = recipes)]
struct RecipeChangeset<'a> {
    title: Option<&'a str>,
    category_id: Option<Uuid>,
    ingredients: Option<serde_json::Value>,
    instructions: Option<&'a [String]>,
    prep_time: Option<i32>,
    cook_time: Option<i32>,
    difficulty: Option<&'a str>,
}

#[derive(Insertable)]
#[diesel(table_name = reviews)]
struct ReviewRecord<'a> {
    recipe_id: Uuid,
    rating: i32,
    comment: &'a str,
    user_name: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = reviews)]
struct ReviewChangeset<'a> {
    rating: Option<i32>,
    comment: Option<&'a str>,
}

fn ingredients_json(
    ingredients: &[crate::models::Ingredient],
) -> Result<serde_json::Value, StoreError> {
    serde_json::to_value(ingredients).map_err(|e| StoreError::Corrupt(e.to_string()))
}

fn find_recipe(conn: &mut PgConnection, id: Uuid) -> Result<Option<Recipe>, StoreError> {
    let row: Option<RecipeRow> = recipes::table
        .find(id)
        .select(RecipeRow::as_select())
        .first(conn)
        .optional()
        .map_err(read_error)?;
    row.map(Recipe::try_from).transpose()
}

#[async_trait]
impl Store for PgStore {
    async fn create_category(&self, new: NewCategory) -> Result<Category, StoreError> {
        self.run("create_category", |conn| {
            diesel::insert_into(categories::table)
                .values(CategoryRecord {
                    name: &new.name,
                    description: &new.description,
                })
                .returning(Category::as_returning())
                .get_result(conn)
                .map_err(|e| write_error(e, "Category"))
        })
    }

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>, StoreError> {
        self.run("get_category", |conn| {
            categories::table
                .find(id)
                .select(Category::as_select())
                .first(conn)
                .optional()
                .map_err(read_error)
        })
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        self.run("list_categories", |conn| {
            categories::table
                .select(Category::as_select())
                .order((categories::created_at.asc(), categories::id.asc()))
                .load(conn)
                .map_err(read_error)
        })
    }

    async fn update_category(
        &self,
        id: Uuid,
        changes: CategoryChanges,
    ) -> Result<Category, StoreError> {
        self.run("update_category", |conn| {
            if changes.is_empty() {
                return categories::table
                    .find(id)
                    .select(Category::as_select())
                    .first(conn)
                    .map_err(|e| write_error(e, "Category"));
            }

            diesel::update(categories::table.find(id))
                .set(CategoryChangeset {
                    name: changes.name.as_deref(),
                    description: changes.description.as_deref(),
                })
                .returning(Category::as_returning())
                .get_result(conn)
                .map_err(|e| write_error(e, "Category"))
        })
    }

    async fn delete_category(&self, id: Uuid) -> Result<(), StoreError> {
        self.run("delete_category", |conn| {
            let count = diesel::delete(categories::table.find(id))
                .execute(conn)
                .map_err(read_error)?;
            deleted(count, "Category")
        })
    }

    async fn create_recipe(&self, new: NewRecipe) -> Result<Recipe, StoreError> {
        let ingredients = ingredients_json(&new.ingredients)?;

        self.run("create_recipe", |conn| {
            let row: RecipeRow = diesel::insert_into(recipes::table)
                .values(RecipeRecord {
                    title: &new.title,
                    category_id: new.category_id,
                    ingredients,
                    instructions: &new.instructions,
                    prep_time: new.prep_time,
                    cook_time: new.cook_time,
                    difficulty: new.difficulty.as_str(),
                })
                .returning(RecipeRow::as_returning())
                .get_result(conn)
                .map_err(|e| write_error(e, "Recipe"))?;
            Recipe::try_from(row)
        })
    }

    async fn get_recipe(&self, id: Uuid) -> Result<Option<Recipe>, StoreError> {
        self.run("get_recipe", |conn| find_recipe(conn, id))
    }

    async fn list_recipes(&self, filter: RecipeFilter) -> Result<Vec<Recipe>, StoreError> {
        self.run("list_recipes", |conn| {
            let mut query = recipes::table
                .select(RecipeRow::as_select())
                .order((recipes::created_at.asc(), recipes::id.asc()))
                .into_boxed();

            if let Some(category_id) = filter.category_id {
                query = query.filter(recipes::category_id.eq(category_id));
            }

            let rows: Vec<RecipeRow> = query.load(conn).map_err(read_error)?;
            rows.into_iter().map(Recipe::try_from).collect()
        })
    }

    async fn update_recipe(&self, id: Uuid, changes: RecipeChanges) -> Result<Recipe, StoreError> {
        let ingredients = changes
            .ingredients
            .as_deref()
            .map(ingredients_json)
            .transpose()?;

        self.run("update_recipe", |conn| {
            if changes.is_empty() {
                return find_recipe(conn, id)?.ok_or(StoreError::NotFound { entity: "Recipe" });
            }

            let row: RecipeRow = diesel::update(recipes::table.find(id))
                .set(RecipeChangeset {
                    title: changes.title.as_deref(),
                    category_id: changes.category_id,
                    ingredients,
                    instructions: changes.instructions.as_deref(),
                    prep_time: changes.prep_time,
                    cook_time: changes.cook_time,
                    difficulty: changes.difficulty.map(Difficulty::as_str),
                })
                .returning(RecipeRow::as_returning())
                .get_result(conn)
                .map_err(|e| write_error(e, "Recipe"))?;
            Recipe::try_from(row)
        })
    }

    async fn delete_recipe(&self, id: Uuid) -> Result<(), StoreError> {
        self.run("delete_recipe", |conn| {
            let count = diesel::delete(recipes::table.find(id))
                .execute(conn)
                .map_err(read_error)?;
            deleted(count, "Recipe")
        })
    }

    async fn create_review(&self, new: NewReview) -> Result<Review, StoreError> {
        self.run("create_review", |conn| {
            diesel::insert_into(reviews::table)
                .values(ReviewRecord {
                    recipe_id: new.recipe_id,
                    rating: new.rating,
                    comment: &new.comment,
                    user_name: &new.user_name,
                })
                .returning(Review::as_returning())
                .get_result(conn)
                .map_err(|e| write_error(e, "Review"))
        })
    }

    async fn get_review(&self, id: Uuid) -> Result<Option<Review>, StoreError> {
        self.run("get_review", |conn| {
            reviews::table
                .find(id)
                .select(Review::as_select())
                .first(conn)
                .optional()
                .map_err(read_error)
        })
    }

    async fn list_reviews(&self, filter: ReviewFilter) -> Result<Vec<Review>, StoreError> {
        self.run("list_reviews", |conn| {
            reviews_query(filter).load(conn).map_err(read_error)
        })
    }

    async fn update_review(&self, id: Uuid, changes: ReviewChanges) -> Result<Review, StoreError> {
        self.run("update_review", |conn| {
            if changes.is_empty() {
                return reviews::table
                    .find(id)
                    .select(Review::as_select())
                    .first(conn)
                    .map_err(|e| write_error(e, "Review"));
            }

            diesel::update(reviews::table.find(id))
                .set(ReviewChangeset {
                    rating: changes.rating,
                    comment: changes.comment.as_deref(),
                })
                .returning(Review::as_returning())
                .get_result(conn)
                .map_err(|e| write_error(e, "Review"))
        })
    }

    async fn delete_review(&self, id: Uuid) -> Result<(), StoreError> {
        self.run("delete_review", |conn| {
            let count = diesel::delete(reviews::table.find(id))
                .execute(conn)
                .map_err(read_error)?;
            deleted(count, "Review")
        })
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_for(filter: ReviewFilter) -> String {
        diesel::debug_query::<Pg, _>(&reviews_query(filter)).to_string()
    }

    #[test]
    fn test_filtered_reviews_break_timestamp_ties_by_id() {
        let sql = sql_for(ReviewFilter {
            recipe_id: Some(Uuid::new_v4()),
        });
        assert!(sql.contains(r#"ORDER BY "reviews"."created_at" DESC, "reviews"."id" DESC"#), "{sql}");
    }

    #[test]
    fn test_unfiltered_reviews_oldest_first() {
        let sql = sql_for(ReviewFilter::default());
        assert!(sql.contains(r#"ORDER BY "reviews"."created_at" ASC, "reviews"."id" ASC"#), "{sql}");
        assert!(!sql.contains("WHERE"), "{sql}");
    }
}
