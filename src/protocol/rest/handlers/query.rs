//! Query Handlers
//!
//! Searches, section and tuple lookups, and passage browsing. Query
//! failures are part of the encoded result (`status == false`), not HTTP
//! errors.

use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    Extension, Json,
};

use crate::encoder::Encoded;
use crate::gateway::{PassageRequest, PassageResponse, SearchRequest, TableRequest};
use crate::kernel::TableKind;
use crate::protocol::rest::dto::{ApiResponse, EncodingParams};
use crate::protocol::rest::error::RestError;
use crate::protocol::Handler;

/// Run a search; `?encoding=record` selects the record encoding
pub async fn search(
    Extension(handler): Extension<Arc<Handler>>,
    Query(params): Query<EncodingParams>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<ApiResponse<Encoded>>, RestError> {
    let encoded = handler.search(&request, params.encoding).await;
    Ok(Json(ApiResponse::success(encoded)))
}

/// Look up sections or tuples, in either encoding
pub async fn table(
    Extension(handler): Extension<Arc<Handler>>,
    Path(kind): Path<String>,
    Query(params): Query<EncodingParams>,
    Json(request): Json<TableRequest>,
) -> Result<Json<ApiResponse<Encoded>>, RestError> {
    let kind: TableKind = kind.parse().map_err(RestError::bad_request)?;
    let response = handler.table(kind, &request, params.encoding).await;
    Ok(Json(ApiResponse::success(response)))
}

pub async fn passage(
    Extension(handler): Extension<Arc<Handler>>,
    Json(request): Json<PassageRequest>,
) -> Result<Json<ApiResponse<PassageResponse>>, RestError> {
    let response = handler.passage(&request).await?;
    Ok(Json(ApiResponse::success(response)))
}
