//! Admin Handlers
//!
//! Health check and statistics endpoints.

use std::sync::Arc;

use axum::{Extension, Json};

use crate::protocol::rest::dto::{ApiResponse, HealthDto, StatsDto};
use crate::protocol::rest::error::RestError;
use crate::protocol::Handler;

/// Health check endpoint
pub async fn health(
    Extension(handler): Extension<Arc<Handler>>,
) -> Result<Json<ApiResponse<HealthDto>>, RestError> {
    let health = HealthDto {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: handler.uptime_seconds(),
    };

    Ok(Json(ApiResponse::success(health)))
}

/// Server statistics endpoint
pub async fn stats(
    Extension(handler): Extension<Arc<Handler>>,
) -> Result<Json<ApiResponse<StatsDto>>, RestError> {
    let gateway = handler.gateway();
    let cache = gateway.negative_cache().stats();

    let stats = StatsDto {
        uptime_secs: handler.uptime_seconds(),
        request_count: handler.total_requests(),
        wild_queries: cache.size,
        cache_hits: cache.hits,
        query_timeout_secs: gateway.limit().as_secs(),
    };

    Ok(Json(ApiResponse::success(stats)))
}
