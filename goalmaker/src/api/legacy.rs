//! Route kept wire-compatible with the goal-creator web UI, which posts
//! `{"goal": ...}` and reads `Message` from the reply.

use axum::{extract::State, Json};
use serde::Serialize;

use super::extractors::AppJson;
use super::v1::dto::goals::SuggestGoalRequest;
use super::AppState;
use crate::error::Result;

#[derive(Debug, Clone, Serialize)]
pub struct LegacySuggestionResponse {
    #[serde(rename = "Message")]
    pub message: String,
}

/// `POST /receive-ai-suggestion`
pub async fn receive_ai_suggestion(
    State(state): State<AppState>,
    AppJson(req): AppJson<SuggestGoalRequest>,
) -> Result<Json<LegacySuggestionResponse>> {
    tracing::info!(goal_len = req.goal.len(), "Received goal suggestion request");

    let message = state.requester.request_completion(&req.goal).await?;

    Ok(Json(LegacySuggestionResponse { message }))
}
