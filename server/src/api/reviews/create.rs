use crate::api::{ApiError, ApiResult, ErrorResponse, JsonBody};
use crate::models::Review;
use crate::store::parse_id;
use crate::validation::ReviewInput;
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// The referenced recipe is resolved before the rest of the body is checked.
#[utoipa::path(
    post,
    path = "/api/reviews",
    tag = "reviews",
    request_body = ReviewInput,
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 400, description = "Validation failure or malformed recipeId", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn create_review(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<ReviewInput>,
) -> ApiResult<(StatusCode, Json<Review>)> {
    if let Some(raw) = input.recipe_id.as_deref().filter(|raw| !raw.trim().is_empty()) {
        let recipe_id = parse_id(raw)?;
        if state.store.get_recipe(recipe_id).await?.is_none() {
            return Err(ApiError::NotFound("Recipe"));
        }
    }

    let new = input.into_new()?;
    let review = state.store.create_review(new).await?;

    tracing::info!(id = %review.id, recipe_id = %review.recipe_id, "Created review");
    Ok((StatusCode::CREATED, Json(review)))
}
