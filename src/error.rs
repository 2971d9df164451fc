use crate::services::{
    analysis::AnalysisError, auth_service::AuthServiceError, token_service::TokenError,
    user_service::UserServiceError,
};
use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

// Type alias for Result with our AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Every failure a request can end in. Server-side kinds carry detail for the
/// log; the client only ever sees the fixed message for the kind.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("User not found")]
    UserNotFound,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authorization header is required")]
    MissingAuthorizationHeader,

    #[error("Authorization header must be 'Bearer <token>'")]
    InvalidAuthorizationFormat,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("File must be CSV or Excel format")]
    UnsupportedFileType,

    #[error("Invalid output format: {0}")]
    InvalidOutputFormat(String),

    #[error("A file must be uploaded in the 'file' field")]
    MissingFile,

    #[error("Uploaded file is too large")]
    PayloadTooLarge,

    #[error("Error processing file: {0}")]
    FileProcessing(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::EmailTaken => StatusCode::CONFLICT,
            AppError::InvalidCredentials
            | AppError::MissingAuthorizationHeader
            | AppError::InvalidAuthorizationFormat
            | AppError::InvalidToken(_)
            | AppError::ExpiredToken => StatusCode::UNAUTHORIZED,
            AppError::Validation(_)
            | AppError::UnsupportedFileType
            | AppError::InvalidOutputFormat(_)
            | AppError::MissingFile => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::FileProcessing(_) | AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to return to the caller.
    pub fn client_message(&self) -> String {
        match self {
            AppError::InvalidToken(_) => "Invalid token".to_string(),
            AppError::InvalidOutputFormat(_) => {
                "Invalid output format. Must be 'csv' or 'excel'.".to_string()
            }
            AppError::Validation(msg) => msg.clone(),
            AppError::FileProcessing(_) => "Error processing file".to_string(),
            AppError::Database(_) | AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(error = %self, "Request unauthorized");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        (status, Json(json!({ "detail": self.client_message() }))).into_response()
    }
}

impl From<UserServiceError> for AppError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::InvalidEmail
            | UserServiceError::InvalidName(_)
            | UserServiceError::EmptyPassword => AppError::Validation(err.to_string()),
            UserServiceError::UserNotFound => AppError::UserNotFound,
            UserServiceError::EmailTaken => AppError::EmailTaken,
            UserServiceError::HashingError(msg) => AppError::Internal(msg),
            UserServiceError::RepositoryError(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AppError::ExpiredToken,
            TokenError::Invalid(msg) => AppError::InvalidToken(msg),
            TokenError::Encoding(msg) => AppError::Internal(msg),
        }
    }
}

impl From<AuthServiceError> for AppError {
    fn from(err: AuthServiceError) -> Self {
        match err {
            AuthServiceError::InvalidCredentials => AppError::InvalidCredentials,
            AuthServiceError::UserNotFound => AppError::UserNotFound,
            AuthServiceError::Token(e) => e.into(),
            AuthServiceError::RepositoryError(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::UnsupportedFileType => AppError::UnsupportedFileType,
            AnalysisError::InvalidOutputFormat(format) => AppError::InvalidOutputFormat(format),
            other => AppError::FileProcessing(other.to_string()),
        }
    }
}

// Extractor rejections carry serde detail; clients get a fixed message.

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(detail = %rejection.body_text(), "Rejected JSON body");
        AppError::Validation("Request body must be a JSON object with the required fields".into())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(detail = %rejection.body_text(), "Rejected query string");
        AppError::Validation("Invalid query parameters".into())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(detail = %rejection.body_text(), "Rejected path parameter");
        AppError::Validation("Invalid path parameter".into())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        tracing::debug!(detail = %rejection.body_text(), "Rejected multipart request");
        AppError::Validation("Request must be multipart/form-data".into())
    }
}
