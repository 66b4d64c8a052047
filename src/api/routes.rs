use axum::{
    middleware,
    routing::{delete, get},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1, one per page of the front-end
fn api_routes() -> Router<AppState> {
    Router::new()
        // Home
        .route("/home", get(handlers::home))
        // Search
        .route("/search-results", get(handlers::search_results))
        // Title details
        .route("/titles/:kind/:id", get(handlers::title_details))
        .route("/titles/:kind/:id/trailer", get(handlers::trailer))
        // Favorites
        .route(
            "/favorites",
            get(handlers::get_favorites).post(handlers::add_favorite),
        )
        .route("/favorites/:id", delete(handlers::remove_favorite))
}
