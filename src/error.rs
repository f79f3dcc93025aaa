use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::auth::password::HashingError;
use crate::store::StoreError;

/// Every failure a request can end in. Rendered as one JSON envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{field}: {message}")]
    ValidationFailed {
        field: &'static str,
        message: String,
    },

    #[error("User already exists")]
    Conflict,

    /// Unknown email and wrong password both end here.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed, forged and expired tokens all end here.
    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("Meal limit reached ({used}/{limit})")]
    QuotaExceeded { used: i32, limit: i32 },

    #[error("upstream failure: {0:#}")]
    Upstream(#[from] anyhow::Error),

    #[error(transparent)]
    Hashing(#[from] HashingError),
}

impl AppError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            AppError::Conflict => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::QuotaExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Upstream(_) | AppError::Hashing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => AppError::Conflict,
            other => AppError::Upstream(other.into()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::validation("body", rejection.body_text())
    }
}

/// `Json` whose rejections use the error envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i32>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = ErrorBody {
            status: "error",
            message: self.to_string(),
            field: None,
            used: None,
            limit: None,
        };

        match &self {
            AppError::ValidationFailed { field, message } => {
                body.field = Some(*field);
                body.message = message.clone();
            }
            AppError::QuotaExceeded { used, limit } => {
                body.used = Some(*used);
                body.limit = Some(*limit);
            }
            AppError::Upstream(e) => {
                error!(error = %format!("{e:#}"), "request failed");
                body.message = "Internal server error".into();
            }
            AppError::Hashing(e) => {
                error!(error = %e, "password hashing failed");
                body.message = "Internal server error".into();
            }
            _ => {}
        }

        (status, Json(body)).into_response()
    }
}
