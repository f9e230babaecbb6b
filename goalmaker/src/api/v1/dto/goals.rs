//! Goal suggestion request/response DTOs.

use serde::{Deserialize, Serialize};

/// Request body shared by `POST /api/v1/goals:suggest` and the compat route.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct SuggestGoalRequest {
    /// The goal, forwarded to the model as-is.
    pub goal: String,
}

/// Response for `POST /api/v1/goals:suggest`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoalSuggestionResponse {
    /// Echo of the submitted goal.
    pub goal: String,
    /// The model's completion, unmodified.
    pub suggestion: String,
}
