use crate::api::{ApiResult, ErrorResponse};
use crate::models::Category;
use crate::AppState;
use axum::{extract::State, Json};

#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "categories",
    responses(
        (status = 200, description = "All categories in creation order", body = Vec<Category>),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    let categories = state.store.list_categories().await?;
    Ok(Json(categories))
}
