use crate::api::{ApiResult, ErrorResponse, JsonPath, MessageResponse, check_dependents};
use crate::config::DeletePolicy;
use crate::store::{parse_id, RecipeFilter, StoreError};
use crate::AppState;
use axum::{extract::State, Json};

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    tag = "categories",
    params(
        ("id" = String, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category deleted", body = MessageResponse),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 409, description = "Recipes still reference the category (restrict policy)", body = ErrorResponse)
    )
)]
pub async fn delete_category(
    State(state): State<AppState>,
    JsonPath(id): JsonPath<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id)?;

    if state.policy.delete == DeletePolicy::Restrict {
        state
            .store
            .get_category(id)
            .await?
            .ok_or(StoreError::NotFound { entity: "Category" })?;

        let recipes = state
            .store
            .list_recipes(RecipeFilter {
                category_id: Some(id),
            })
            .await?;
        check_dependents("Category", recipes.len(), "recipes")?;
    }

    state.store.delete_category(id).await?;

    tracing::info!(%id, "Deleted category");
    Ok(Json(MessageResponse::new("Category deleted")))
}
