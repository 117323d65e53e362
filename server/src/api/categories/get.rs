use crate::api::{ApiResult, ErrorResponse, JsonPath};
use crate::models::Category;
use crate::store::{parse_id, StoreError};
use crate::AppState;
use axum::{extract::State, Json};

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    tag = "categories",
    params(
        ("id" = String, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category details", body = Category),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    JsonPath(id): JsonPath<String>,
) -> ApiResult<Json<Category>> {
    let id = parse_id(&id)?;

    let category = state
        .store
        .get_category(id)
        .await?
        .ok_or(StoreError::NotFound { entity: "Category" })?;

    Ok(Json(category))
}
