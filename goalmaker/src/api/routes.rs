use axum::{routing::post, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::legacy;
use super::v1;
use super::AppState;

pub fn create_router(state: AppState) -> Router {
    // The goal UI is served from its own dev server, so every origin is allowed.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let v1 = v1::router::v1_router();

    Router::new()
        .route(
            "/receive-ai-suggestion",
            post(legacy::receive_ai_suggestion),
        )
        .nest("/api/v1", v1)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
