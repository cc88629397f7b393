//! REST API Error Types
//!
//! Provides error types and conversions for the REST API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::gateway::GatewayError;
use crate::protocol::rest::dto::ApiResponse;

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

/// REST API error that can be returned from handlers
#[derive(Debug)]
pub struct RestError {
    pub status: StatusCode,
    pub error: ApiError,
}

impl RestError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: ApiError::bad_request(message),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: ApiError::internal(message),
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::failure(self.error))).into_response()
    }
}

// Conversions from domain errors
impl From<GatewayError> for RestError {
    fn from(err: GatewayError) -> Self {
        let (status, code) = match &err {
            e if e.is_abort() => (StatusCode::GATEWAY_TIMEOUT, "QUERY_ABORTED"),
            GatewayError::KernelFailure { .. } | GatewayError::AllQueriesFailed { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "QUERY_FAILED")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };
        Self {
            status,
            error: ApiError::new(code, err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::QueryId;
    use std::time::Duration;

    #[test]
    fn test_abort_maps_to_gateway_timeout() {
        let err: RestError = GatewayError::CachedAbort {
            query: QueryId::from("foo*bar"),
            limit: Duration::from_secs(180),
        }
        .into();
        assert_eq!(err.status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(err.error.code, "QUERY_ABORTED");
        assert!(err.error.message.contains("known to take longer"));
    }

    #[test]
    fn test_kernel_failure_maps_to_unprocessable() {
        let err: RestError = GatewayError::kernel_failure("bad feature").into();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.error.message, "bad feature");
    }

    #[test]
    fn test_fresh_timeout_and_archive_errors() {
        let err: RestError = GatewayError::TimedOut {
            query: QueryId::from("foo*bar"),
            limit: Duration::from_secs(180),
        }
        .into();
        assert_eq!(err.status, StatusCode::GATEWAY_TIMEOUT);

        let err: RestError = GatewayError::Archive("disk full".to_string()).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error.code, "INTERNAL_ERROR");
    }
}
