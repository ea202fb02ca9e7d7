use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::error::ErrorReport;
use crate::application::posts::PublishError;

/// Wire shape for every handled error: `{"error": "<message>"}`.
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: &'static str,
    detail: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: &'static str, detail: Option<String>) -> Self {
        Self {
            status,
            message,
            detail,
        }
    }

    pub fn not_configured() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Blog posting is not configured.",
            None,
        )
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized.", None)
    }

    pub fn missing_fields() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "Title and post body are required.",
            None,
        )
    }

    pub fn storage(detail: String) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Blog storage is unavailable.",
            Some(detail),
        )
    }
}

impl From<PublishError> for ApiError {
    fn from(error: PublishError) -> Self {
        match error {
            PublishError::NotConfigured => Self::not_configured(),
            PublishError::Unauthorized => Self::unauthorized(),
            PublishError::Domain(_) => Self::missing_fields(),
            PublishError::Store(err) => Self::storage(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.message.to_string(),
        };
        let mut response = (self.status, Json(body)).into_response();
        // Attach a structured report so shared logging middleware can emit rich diagnostics.
        ErrorReport::from_message(
            "infra::http::api",
            self.status,
            self.detail.unwrap_or_else(|| self.message.to_string()),
        )
        .attach(&mut response);
        response
    }
}
