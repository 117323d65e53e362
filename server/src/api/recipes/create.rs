use super::ensure_category;
use crate::api::{ApiResult, ErrorResponse, JsonBody};
use crate::models::Recipe;
use crate::validation::RecipeInput;
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = RecipeInput,
    responses(
        (status = 201, description = "Recipe created", body = Recipe),
        (status = 400, description = "Validation failure", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
pub async fn create_recipe(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<RecipeInput>,
) -> ApiResult<(StatusCode, Json<Recipe>)> {
    let new = input.into_new(state.policy.require_recipe_category)?;
    ensure_category(&state, new.category_id).await?;

    let recipe = state.store.create_recipe(new).await?;

    tracing::info!(id = %recipe.id, title = %recipe.title, "Created recipe");
    Ok((StatusCode::CREATED, Json(recipe)))
}
