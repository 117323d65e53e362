use crate::api::{ApiResult, ErrorResponse, JsonBody, JsonPath};
use crate::models::Review;
use crate::store::parse_id;
use crate::validation::ReviewInput;
use crate::AppState;
use axum::{extract::State, Json};

/// Only `rating` and `comment` can change.
#[utoipa::path(
    put,
    path = "/api/reviews/{id}",
    tag = "reviews",
    params(
        ("id" = String, Path, description = "Review ID")
    ),
    request_body = ReviewInput,
    responses(
        (status = 200, description = "Review updated", body = Review),
        (status = 400, description = "Validation failure or malformed identifier", body = ErrorResponse),
        (status = 404, description = "Review not found", body = ErrorResponse)
    )
)]
pub async fn update_review(
    State(state): State<AppState>,
    JsonPath(id): JsonPath<String>,
    JsonBody(input): JsonBody<ReviewInput>,
) -> ApiResult<Json<Review>> {
    let id = parse_id(&id)?;
    let changes = input.into_changes()?;

    let review = state.store.update_review(id, changes).await?;
    Ok(Json(review))
}
