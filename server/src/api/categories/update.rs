use crate::api::{ApiResult, ErrorResponse, JsonBody, JsonPath};
use crate::models::Category;
use crate::store::parse_id;
use crate::validation::CategoryInput;
use crate::AppState;
use axum::{extract::State, Json};

/// Only the supplied fields change. `createdAt` in the body is ignored.
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    tag = "categories",
    params(
        ("id" = String, Path, description = "Category ID")
    ),
    request_body = CategoryInput,
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 400, description = "Validation failure, duplicate name or malformed identifier", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
pub async fn update_category(
    State(state): State<AppState>,
    JsonPath(id): JsonPath<String>,
    JsonBody(input): JsonBody<CategoryInput>,
) -> ApiResult<Json<Category>> {
    let id = parse_id(&id)?;
    let changes = input.into_changes()?;

    let category = state.store.update_category(id, changes).await?;
    Ok(Json(category))
}
