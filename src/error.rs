use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::response::{ApiResponse, ResponseCode};

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Business code and client-facing message for this error.
    ///
    /// Server-side failures never expose their inner text.
    pub fn code_and_message(&self) -> (i32, String) {
        match self {
            AppError::Database(_) => (
                ResponseCode::DATABASE_ERROR,
                "Internal server error".to_string(),
            ),
            AppError::Serialization(_) => (
                ResponseCode::INTERNAL_ERROR,
                "Data serialization error".to_string(),
            ),
            AppError::Io(_) => (ResponseCode::INTERNAL_ERROR, "File IO error".to_string()),
            AppError::Config(_) => (
                ResponseCode::INTERNAL_ERROR,
                "Configuration error".to_string(),
            ),
            AppError::Validation(msg) => (ResponseCode::BAD_REQUEST, msg.clone()),
            AppError::Conflict(msg) => (ResponseCode::BAD_REQUEST, msg.clone()),
            AppError::InvalidTransition(msg) => (ResponseCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (ResponseCode::NOT_FOUND, msg.clone()),
            AppError::Forbidden(msg) => (ResponseCode::FORBIDDEN, msg.clone()),
            AppError::Unauthorized(msg) => (ResponseCode::UNAUTHORIZED, msg.clone()),
            AppError::Storage(_) => (ResponseCode::STORAGE_ERROR, "Storage error".to_string()),
            AppError::Internal(_) => (
                ResponseCode::INTERNAL_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, message) = self.code_and_message();

        if code >= ResponseCode::INTERNAL_ERROR {
            tracing::error!("Application error: {}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }

        ApiResponse::<()>::error(code, message).into_response()
    }
}

/// Application Result alias
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn invalid_transition<T: Into<String>>(msg: T) -> Self {
        Self::InvalidTransition(msg.into())
    }

    /// `NotFound` for a missing resource, e.g. "Sample not found"
    pub fn not_found<T: Into<String>>(resource: T) -> Self {
        Self::NotFound(format!("{} not found", resource.into()))
    }

    /// `NotFound` with a custom message
    pub fn not_found_message<T: Into<String>>(msg: T) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn forbidden<T: Into<String>>(msg: T) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn storage<T: Into<String>>(msg: T) -> Self {
        Self::Storage(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal<T: Into<String>>(msg: T) -> Self {
        Self::Internal(anyhow::anyhow!(msg.into()))
    }
}
