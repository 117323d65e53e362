use crate::api::{ApiResult, ErrorResponse, JsonPath, MessageResponse, check_dependents};
use crate::config::DeletePolicy;
use crate::store::{parse_id, ReviewFilter, StoreError};
use crate::AppState;
use axum::{extract::State, Json};

/// Reviews of the recipe are left in place unless the restrict policy is on,
/// in which case the delete is refused while any exist.
#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = String, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe deleted", body = MessageResponse),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 409, description = "Reviews still reference the recipe (restrict policy)", body = ErrorResponse)
    )
)]
pub async fn delete_recipe(
    State(state): State<AppState>,
    JsonPath(id): JsonPath<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id)?;

    if state.policy.delete == DeletePolicy::Restrict {
        state
            .store
            .get_recipe(id)
            .await?
            .ok_or(StoreError::NotFound { entity: "Recipe" })?;

        let reviews = state
            .store
            .list_reviews(ReviewFilter { recipe_id: Some(id) })
            .await?;
        check_dependents("Recipe", reviews.len(), "reviews")?;
    }

    state.store.delete_recipe(id).await?;

    tracing::info!(%id, "Deleted recipe");
    Ok(Json(MessageResponse::new("Recipe deleted")))
}
