//! API response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use orderly_core::{ErrorResponse, OrderlyError};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Standard API response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub status_code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,
}

impl<T> ApiResponse<T> {
    /// Creates a successful response.
    pub fn success(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            status_code: status.as_u16(),
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    /// Creates an error response.
    pub fn error(status: StatusCode, error: ErrorResponse) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            status_code: status.as_u16(),
            message: error.message.clone(),
            data: None,
            error: Some(error),
        }
    }
}

/// Application error type for Axum.
#[derive(Debug)]
pub struct AppError(pub OrderlyError);

impl From<OrderlyError> for AppError {
    fn from(err: OrderlyError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut error_response = ErrorResponse::from_error(&self.0);
        if !self.0.is_client_error() {
            // Store and internal details stay in the logs.
            error!("Request failed: {}", self.0);
            error_response.message = "Internal server error".to_string();
        }

        let body = Json(ApiResponse::<()>::error(status, error_response));
        (status, body).into_response()
    }
}

/// Result type for Axum handlers.
pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), AppError>;

/// Helper to create a success (200) response.
pub fn ok<T: Serialize>(message: impl Into<String>, data: T) -> ApiResult<T> {
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(StatusCode::OK, message, data)),
    ))
}

/// Helper to create a created (201) response.
pub fn created<T: Serialize>(message: impl Into<String>, data: T) -> ApiResult<T> {
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(StatusCode::CREATED, message, data)),
    ))
}
