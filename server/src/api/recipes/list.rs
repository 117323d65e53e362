use crate::api::{ApiResult, ErrorResponse, JsonQuery};
use crate::models::Recipe;
use crate::store::{parse_id, RecipeFilter};
use crate::AppState;
use axum::{extract::State, Json};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct ListRecipesParams {
    /// Only recipes filed under this category
    pub category_id: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Matching recipes in creation order", body = Vec<Recipe>),
        (status = 400, description = "Malformed categoryId", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    State(state): State<AppState>,
    JsonQuery(params): JsonQuery<ListRecipesParams>,
) -> ApiResult<Json<Vec<Recipe>>> {
    let filter = RecipeFilter {
        category_id: params
            .category_id
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(parse_id)
            .transpose()?,
    };

    let recipes = state.store.list_recipes(filter).await?;
    Ok(Json(recipes))
}
