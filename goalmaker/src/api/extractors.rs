use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;

use crate::error::GoalsError;

/// `axum::Json` whose rejections become [`GoalsError::Validation`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(GoalsError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for GoalsError {
    fn from(rejection: JsonRejection) -> Self {
        map_json_rejection(rejection)
    }
}

fn map_json_rejection(rejection: JsonRejection) -> GoalsError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let message = err.body_text();
            if let Some(field) = extract_missing_field(&message) {
                GoalsError::Validation(format!("Missing required field: {field}"))
            } else {
                GoalsError::Validation(format!("Invalid JSON: {message}"))
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            GoalsError::Validation(format!("JSON syntax error: {err}"))
        }
        JsonRejection::MissingJsonContentType(_) => {
            GoalsError::Validation("Missing `Content-Type: application/json` header".to_string())
        }
        JsonRejection::BytesRejection(_) => {
            GoalsError::Internal("Failed to read request body".to_string())
        }
        _ => GoalsError::Validation(rejection.to_string()),
    }
}

fn extract_missing_field(message: &str) -> Option<&str> {
    let prefix = "missing field `";
    let start = message.find(prefix)? + prefix.len();
    let remaining = message.get(start..)?;
    let end = remaining.find('`')?;
    remaining.get(..end)
}
