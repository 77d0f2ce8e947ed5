use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Unified API response envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Business response code
    pub code: i32,
    /// Human readable message
    pub msg: String,
    /// Response payload
    pub data: Option<T>,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    /// Successful response
    pub fn success(data: T) -> Self {
        Self {
            code: ResponseCode::SUCCESS,
            msg: "Success".to_string(),
            data: Some(data),
        }
    }

    /// Successful response with a custom message
    pub fn success_with_message(data: T, msg: impl Into<String>) -> Self {
        Self {
            code: ResponseCode::SUCCESS,
            msg: msg.into(),
            data: Some(data),
        }
    }

    /// Resource created (HTTP 201)
    pub fn created(data: T) -> Self {
        Self {
            code: ResponseCode::CREATED,
            msg: "Created".to_string(),
            data: Some(data),
        }
    }

    /// Error response
    pub fn error(code: i32, msg: String) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg,
            data: None,
        }
    }
}

impl<T> IntoResponse for ApiResponse<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        let status = match self.code {
            ResponseCode::SUCCESS => StatusCode::OK,
            ResponseCode::CREATED => StatusCode::CREATED,
            ResponseCode::BAD_REQUEST => StatusCode::BAD_REQUEST,
            ResponseCode::UNAUTHORIZED => StatusCode::UNAUTHORIZED,
            ResponseCode::FORBIDDEN => StatusCode::FORBIDDEN,
            ResponseCode::NOT_FOUND => StatusCode::NOT_FOUND,
            ResponseCode::SERVICE_UNAVAILABLE => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

/// Business response codes
pub struct ResponseCode;

impl ResponseCode {
    pub const SUCCESS: i32 = 200;
    pub const CREATED: i32 = 201;

    /// Client errors 4xx
    pub const BAD_REQUEST: i32 = 400;
    pub const UNAUTHORIZED: i32 = 401;
    pub const FORBIDDEN: i32 = 403;
    pub const NOT_FOUND: i32 = 404;

    /// Server errors 5xx
    pub const INTERNAL_ERROR: i32 = 500;
    pub const DATABASE_ERROR: i32 = 501;
    pub const STORAGE_ERROR: i32 = 502;
    pub const SERVICE_UNAVAILABLE: i32 = 503;
}

impl ResponseCode {
    pub fn get_message(code: i32) -> &'static str {
        match code {
            Self::SUCCESS => "Success",
            Self::CREATED => "Created",
            Self::BAD_REQUEST => "Bad request",
            Self::UNAUTHORIZED => "Unauthorized",
            Self::FORBIDDEN => "Forbidden",
            Self::NOT_FOUND => "Resource not found",
            Self::INTERNAL_ERROR => "Internal server error",
            Self::DATABASE_ERROR => "Database error",
            Self::STORAGE_ERROR => "Storage error",
            Self::SERVICE_UNAVAILABLE => "Service unavailable",
            _ => "Unknown error",
        }
    }
}

#[macro_export]
macro_rules! ok_response {
    ($data:expr) => {
        $crate::response::ApiResponse::success($data)
    };
}

#[macro_export]
macro_rules! err_response {
    ($code:expr) => {
        $crate::response::ApiResponse::<()>::error(
            $code,
            $crate::response::ResponseCode::get_message($code).to_string(),
        )
    };
    ($code:expr, $msg:expr) => {
        $crate::response::ApiResponse::<()>::error($code, $msg.to_string())
    };
}
