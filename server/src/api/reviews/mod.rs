pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use crate::models::Review;
use crate::validation::ReviewInput;
use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/reviews endpoints (mounted at /api/reviews)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_reviews).post(create::create_review))
        .route(
            "/{id}",
            get(get::get_review)
                .put(update::update_review)
                .delete(delete::delete_review),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_reviews,
        get::get_review,
        create::create_review,
        update::update_review,
        delete::delete_review,
    ),
    components(schemas(Review, ReviewInput))
)]
pub struct ApiDoc;
