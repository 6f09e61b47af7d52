use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    let recommendations = Router::new()
        .route("/", post(handlers::recommend))
        .route("/topic/:topic", post(handlers::recommend_by_topic))
        .route("/history/:user_id", get(handlers::get_history));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1/recommendations", recommendations)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
