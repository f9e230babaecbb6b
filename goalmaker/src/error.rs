use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GoalsError {
    /// Any failure that originates from the model-serving API: network,
    /// authentication, rate limiting, unknown model or a malformed reply.
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl GoalsError {
    pub fn is_upstream(&self) -> bool {
        matches!(self, GoalsError::Upstream(_))
    }
}

impl IntoResponse for GoalsError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            GoalsError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            GoalsError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            GoalsError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            GoalsError::Io(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            GoalsError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "error": message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, GoalsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_maps_to_bad_gateway() {
        let response = GoalsError::Upstream("connection refused".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let response = GoalsError::Validation("Missing required field: goal".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn config_maps_to_internal_error() {
        let response = GoalsError::Config("LLM_BASE_URL missing".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn is_upstream_only_for_upstream_variant() {
        assert!(GoalsError::Upstream("x".into()).is_upstream());
        assert!(!GoalsError::Internal("x".into()).is_upstream());
    }
}
