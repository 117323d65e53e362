use crate::api::{ApiResult, ErrorResponse, JsonPath};
use crate::models::Recipe;
use crate::store::{parse_id, StoreError};
use crate::AppState;
use axum::{extract::State, Json};

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = String, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe details", body = Recipe),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    State(state): State<AppState>,
    JsonPath(id): JsonPath<String>,
) -> ApiResult<Json<Recipe>> {
    let id = parse_id(&id)?;

    let recipe = state
        .store
        .get_recipe(id)
        .await?
        .ok_or(StoreError::NotFound { entity: "Recipe" })?;

    Ok(Json(recipe))
}
