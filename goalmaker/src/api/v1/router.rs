use axum::{
    routing::{get, post},
    Router,
};

use crate::api::state::AppState;

use super::handlers;

pub fn v1_router() -> Router<AppState> {
    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(super::openapi::openapi_json))
        .merge(super::openapi::redoc_router());

    let goal_routes = Router::new().route("/goals:suggest", post(handlers::goals::suggest_goal));

    Router::new().merge(public_routes).merge(goal_routes)
}
