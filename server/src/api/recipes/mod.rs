pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use crate::api::ApiResult;
use crate::models::Recipe;
use crate::store::StoreError;
use crate::validation::{IngredientInput, RecipeInput};
use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;
use uuid::Uuid;

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_recipes).post(create::create_recipe))
        .route(
            "/{id}",
            get(get::get_recipe)
                .put(update::update_recipe)
                .delete(delete::delete_recipe),
        )
}

/// A recipe may only be filed under a category that exists.
async fn ensure_category(state: &AppState, category_id: Option<Uuid>) -> ApiResult<()> {
    if let Some(id) = category_id {
        if state.store.get_category(id).await?.is_none() {
            return Err(StoreError::NotFound { entity: "Category" }.into());
        }
    }
    Ok(())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_recipes,
        get::get_recipe,
        create::create_recipe,
        update::update_recipe,
        delete::delete_recipe,
    ),
    components(schemas(Recipe, RecipeInput, IngredientInput))
)]
pub struct ApiDoc;
