pub mod categories;
mod error;
mod extract;
pub mod recipes;
pub mod reviews;

pub use error::{ApiError, ApiResult, ErrorResponse, FieldError};
pub use extract::{JsonBody, JsonPath, JsonQuery};

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::models::{Difficulty, Ingredient, Unit};
use crate::validation::ViolationKind;

/// Confirmation body for deletes.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WelcomeResponse {
    pub message: String,
    pub available_endpoints: AvailableEndpoints,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AvailableEndpoints {
    pub recipes: String,
    pub categories: String,
    pub reviews: String,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "meta",
    responses(
        (status = 200, description = "Service greeting and resource paths", body = WelcomeResponse)
    )
)]
pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the Recipe Management API".to_string(),
        available_endpoints: AvailableEndpoints {
            recipes: "/api/recipes".to_string(),
            categories: "/api/categories".to_string(),
            reviews: "/api/reviews".to_string(),
        },
    })
}

/// Fallback for unmatched routes.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            message: "Route not found".to_string(),
            details: None,
        }),
    )
}

/// Refuse a delete under the restrict policy while `dependents` is non-zero.
pub(crate) fn check_dependents(entity: &str, dependents: usize, kind: &str) -> ApiResult<()> {
    if dependents > 0 {
        return Err(ApiError::Conflict(format!(
            "{entity} still has {dependents} {kind}"
        )));
    }
    Ok(())
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Base spec with shared components
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Pantry API", description = "Recipes, categories and reviews"),
        paths(welcome),
        components(schemas(
            ErrorResponse,
            FieldError,
            MessageResponse,
            WelcomeResponse,
            AvailableEndpoints,
            Ingredient,
            Unit,
            Difficulty,
            ViolationKind,
        ))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    // Merge in each module's spec
    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        categories::ApiDoc::openapi(),
        recipes::ApiDoc::openapi(),
        reviews::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        // Merge paths
        spec.paths.paths.extend(module_spec.paths.paths);

        // Merge components (schemas)
        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_resource() {
        let spec = openapi();
        for path in [
            "/",
            "/api/categories",
            "/api/categories/{id}",
            "/api/recipes",
            "/api/recipes/{id}",
            "/api/reviews",
            "/api/reviews/{id}",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
