//! API 에러 타입

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tg_engine::EngineError;

/// API 에러
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request: {message}")]
    BadRequest { message: String },

    #[error("internal error: {message}")]
    Internal { message: String },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// 에러 응답 JSON
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(rename = "requestId", skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::BadRequest { message } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message.clone())
            }
            ApiError::Internal { message } => {
                tracing::error!("Internal error: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message.clone())
            }
            ApiError::Engine(EngineError::Validation { message }) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message.clone())
            }
            ApiError::Engine(EngineError::NotFound { message }) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", message.clone())
            }
            ApiError::Engine(EngineError::Store(e)) => {
                tracing::error!("Store error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "STORE_ERROR", e.to_string())
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
                request_id: crate::middleware::current_request_id(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// 본문이 JSON이 아니거나 형식이 맞지 않으면 검증 에러
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
