//! v1 Goal handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::api::v1::dto::goals::{GoalSuggestionResponse, SuggestGoalRequest};
use crate::api::v1::response::{ApiError, ApiResponse};
use crate::api::AppState;
use crate::error::GoalsError;

/// `POST /api/v1/goals:suggest`
///
/// Forwards the goal to the configured model as a single user message and
/// returns the completion unmodified. The goal is not validated locally; an
/// empty goal is sent as-is and the upstream decides what to do with it.
#[utoipa::path(
    post,
    path = "/api/v1/goals:suggest",
    tag = "goals",
    operation_id = "goals.suggest",
    request_body = SuggestGoalRequest,
    responses(
        (status = 200, description = "Suggestion generated", body = GoalSuggestionResponse),
        (status = 400, description = "Malformed request body", body = ApiError),
        (status = 502, description = "Language model service failed", body = ApiError),
    )
)]
pub async fn suggest_goal(
    State(state): State<AppState>,
    payload: Result<Json<SuggestGoalRequest>, JsonRejection>,
) -> ApiResponse<GoalSuggestionResponse> {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return GoalsError::from(rejection).into(),
    };

    match state.requester.request_completion(&req.goal).await {
        Ok(suggestion) => ApiResponse::success(GoalSuggestionResponse {
            goal: req.goal,
            suggestion,
        }),
        Err(e) => e.into(),
    }
}
