//! REST API Data Transfer Objects
//!
//! Defines request/response types for the REST API endpoints.

use serde::{Deserialize, Serialize};

use crate::encoder::Encoding;
use crate::protocol::rest::error::ApiError;

/// JSON response: { success, data?, error? }
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn failure(error: ApiError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

/// Query-string options of `/query` and `/table/:kind`
#[derive(Debug, Default, Deserialize)]
pub struct EncodingParams {
    #[serde(default)]
    pub encoding: Encoding,
}

/// Body of a `/download` answer that produced no archive
#[derive(Debug, Serialize, Deserialize)]
pub struct DownloadAbortDto {
    pub status: bool,
    pub messages: String,
}

// Admin DTOs
/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthDto {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Server statistics
#[derive(Debug, Serialize)]
pub struct StatsDto {
    pub uptime_secs: u64,
    pub request_count: u64,
    /// Queries known to exceed the time limit
    pub wild_queries: usize,
    /// Requests rejected by the negative cache
    pub cache_hits: u64,
    pub query_timeout_secs: u64,
}
