use crate::api::{ApiResult, ErrorResponse, JsonBody};
use crate::models::Category;
use crate::validation::CategoryInput;
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};

#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "categories",
    request_body = CategoryInput,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Validation failure or duplicate name", body = ErrorResponse)
    )
)]
pub async fn create_category(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CategoryInput>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let new = input.into_new()?;
    let category = state.store.create_category(new).await?;

    tracing::info!(id = %category.id, name = %category.name, "Created category");
    Ok((StatusCode::CREATED, Json(category)))
}
