use super::ensure_category;
use crate::api::{ApiResult, ErrorResponse, JsonBody, JsonPath};
use crate::models::Recipe;
use crate::store::parse_id;
use crate::validation::RecipeInput;
use crate::AppState;
use axum::{extract::State, Json};

/// Only the supplied fields change; `ingredients` and `instructions` are
/// replaced as a whole. `createdAt` in the body is ignored.
#[utoipa::path(
    put,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = String, Path, description = "Recipe ID")
    ),
    request_body = RecipeInput,
    responses(
        (status = 200, description = "Recipe updated", body = Recipe),
        (status = 400, description = "Validation failure or malformed identifier", body = ErrorResponse),
        (status = 404, description = "Recipe or category not found", body = ErrorResponse)
    )
)]
pub async fn update_recipe(
    State(state): State<AppState>,
    JsonPath(id): JsonPath<String>,
    JsonBody(input): JsonBody<RecipeInput>,
) -> ApiResult<Json<Recipe>> {
    let id = parse_id(&id)?;
    let changes = input.into_changes()?;
    ensure_category(&state, changes.category_id).await?;

    let recipe = state.store.update_recipe(id, changes).await?;
    Ok(Json(recipe))
}
