use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-wide error taxonomy.
///
/// Every failure a handler can surface maps onto exactly one variant, each
/// with a stable machine-readable code and an HTTP status. 401 is used
/// strictly for credential problems, 403 for failed role/approval predicates.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Authorization header missing or malformed")]
    MissingCredential,

    #[error("Token expired")]
    ExpiredCredential,

    #[error("Invalid token")]
    InvalidCredential,

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("OTP has expired")]
    OtpExpired,

    #[error("Database error: {0}")]
    Database(anyhow::Error),

    #[error("Email error: {0}")]
    Email(String),

    #[error("Configuration error: {0}")]
    Config(anyhow::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code exposed to clients.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingCredential => "MISSING_CREDENTIAL",
            AppError::ExpiredCredential => "EXPIRED_CREDENTIAL",
            AppError::InvalidCredential => "INVALID_CREDENTIAL",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) => "VALIDATION",
            AppError::OtpExpired => "OTP_EXPIRED",
            AppError::Database(_)
            | AppError::Email(_)
            | AppError::Config(_)
            | AppError::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingCredential
            | AppError::ExpiredCredential
            | AppError::InvalidCredential
            | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) | AppError::OtpExpired => StatusCode::BAD_REQUEST,
            AppError::Database(_)
            | AppError::Email(_)
            | AppError::Config(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(anyhow::Error::new(err))
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::Database(anyhow::Error::new(err))
    }
}

impl From<lettre::error::Error> for AppError {
    fn from(err: lettre::error::Error) -> Self {
        AppError::Email(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorBody {
            success: bool,
            code: &'static str,
            message: String,
        }

        let status = self.status();
        let code = self.code();

        // Internal details stay in the logs, not the response body.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                code,
                message,
            }),
        )
            .into_response()
    }
}
