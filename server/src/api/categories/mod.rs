pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use crate::models::Category;
use crate::validation::CategoryInput;
use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/categories endpoints (mounted at /api/categories)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_categories).post(create::create_category))
        .route(
            "/{id}",
            get(get::get_category)
                .put(update::update_category)
                .delete(delete::delete_category),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_categories,
        get::get_category,
        create::create_category,
        update::update_category,
        delete::delete_category,
    ),
    components(schemas(Category, CategoryInput))
)]
pub struct ApiDoc;
