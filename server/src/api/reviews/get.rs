use crate::api::{ApiResult, ErrorResponse, JsonPath};
use crate::models::Review;
use crate::store::{parse_id, StoreError};
use crate::AppState;
use axum::{extract::State, Json};

#[utoipa::path(
    get,
    path = "/api/reviews/{id}",
    tag = "reviews",
    params(
        ("id" = String, Path, description = "Review ID")
    ),
    responses(
        (status = 200, description = "Review details", body = Review),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 404, description = "Review not found", body = ErrorResponse)
    )
)]
pub async fn get_review(
    State(state): State<AppState>,
    JsonPath(id): JsonPath<String>,
) -> ApiResult<Json<Review>> {
    let id = parse_id(&id)?;

    let review = state
        .store
        .get_review(id)
        .await?
        .ok_or(StoreError::NotFound { entity: "Review" })?;

    Ok(Json(review))
}
