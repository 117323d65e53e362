use crate::api::{ApiResult, ErrorResponse, JsonQuery};
use crate::models::Review;
use crate::store::{parse_id, ReviewFilter};
use crate::AppState;
use axum::{extract::State, Json};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct ListReviewsParams {
    /// Only reviews of this recipe, newest first
    pub recipe_id: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/reviews",
    tag = "reviews",
    params(ListReviewsParams),
    responses(
        (status = 200, description = "Matching reviews", body = Vec<Review>),
        (status = 400, description = "Malformed recipeId", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    JsonQuery(params): JsonQuery<ListReviewsParams>,
) -> ApiResult<Json<Vec<Review>>> {
    let filter = ReviewFilter {
        recipe_id: params
            .recipe_id
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(parse_id)
            .transpose()?,
    };

    let reviews = state.store.list_reviews(filter).await?;
    Ok(Json(reviews))
}
