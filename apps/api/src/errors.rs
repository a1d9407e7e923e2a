use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;
use crate::dashboard::notice::Notice;
use crate::flows::FlowError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Local input problem, caught before any remote call. Rendered inline by the client.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The same action is already in flight for this visit.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Generation error: {message}")]
    Generation { message: String, notice: Notice },

    /// Identity provider rejected the call. The message is the provider's, verbatim.
    #[error("Auth error: {0}")]
    Auth(String),
}

impl AppError {
    /// Maps a flow failure, attaching the notice the client shows for a generation failure.
    pub fn from_flow(err: FlowError, notice: Notice) -> Self {
        match err {
            FlowError::Validation(msg) => AppError::Validation(msg),
            FlowError::Generation(message) => AppError::Generation { message, notice },
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(msg) => AppError::Validation(msg),
            AuthError::Provider(msg) | AuthError::Transport(msg) => AppError::Auth(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, notice) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg, None),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg, None),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
                None,
            ),
            AppError::Generation { message, notice } => {
                tracing::error!("Generation error: {message}");
                (
                    StatusCode::BAD_GATEWAY,
                    "GENERATION_ERROR",
                    "An AI processing error occurred".to_string(),
                    Some(notice),
                )
            }
            AppError::Auth(msg) => {
                tracing::warn!("Identity provider rejected request: {msg}");
                let notice = Notice::error(msg.clone());
                (StatusCode::UNAUTHORIZED, "AUTH_ERROR", msg, Some(notice))
            }
        };

        let mut error = json!({
            "code": code,
            "message": message,
        });
        if let Some(notice) = notice {
            error["notice"] = json!(notice);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_maps_to_bad_request_without_notice() {
        let response = AppError::Validation("Ticker is required".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["message"], "Ticker is required");
        assert!(body["error"].get("notice").is_none());
    }

    #[tokio::test]
    async fn test_generation_error_hides_detail_and_carries_notice() {
        let response = AppError::Generation {
            message: "upstream 500: overloaded".into(),
            notice: Notice::summarization_failed(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "GENERATION_ERROR");
        assert_eq!(body["error"]["notice"]["title"], "Summarization Failed");
        assert!(!body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("overloaded"));
    }

    #[tokio::test]
    async fn test_auth_error_surfaces_provider_message_verbatim() {
        let response = AppError::from(AuthError::Provider("EMAIL_EXISTS".into())).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"]["message"], "EMAIL_EXISTS");
        assert_eq!(body["error"]["notice"]["description"], "EMAIL_EXISTS");
    }

    #[test]
    fn test_flow_validation_stays_validation() {
        let err = AppError::from_flow(
            FlowError::Validation("ticker must not be empty".into()),
            Notice::alert_generation_failed(),
        );
        assert!(matches!(err, AppError::Validation(_)));
    }
}
