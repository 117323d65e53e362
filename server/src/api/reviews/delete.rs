use crate::api::{ApiResult, ErrorResponse, JsonPath, MessageResponse};
use crate::store::parse_id;
use crate::AppState;
use axum::{extract::State, Json};

#[utoipa::path(
    delete,
    path = "/api/reviews/{id}",
    tag = "reviews",
    params(
        ("id" = String, Path, description = "Review ID")
    ),
    responses(
        (status = 200, description = "Review deleted", body = MessageResponse),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 404, description = "Review not found", body = ErrorResponse)
    )
)]
pub async fn delete_review(
    State(state): State<AppState>,
    JsonPath(id): JsonPath<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id)?;
    state.store.delete_review(id).await?;

    tracing::info!(%id, "Deleted review");
    Ok(Json(MessageResponse::new("Review deleted")))
}
