//! Export and Download Handlers

use std::sync::Arc;

use axum::{
    http::{header::HeaderName, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Extension, Json,
};

use crate::encoder::render_messages;
use crate::export::{ExportDocument, ExportRequest};
use crate::gateway::DownloadRequest;
use crate::protocol::rest::dto::{ApiResponse, DownloadAbortDto};
use crate::protocol::rest::error::RestError;
use crate::protocol::Handler;

pub async fn export(
    Extension(handler): Extension<Arc<Handler>>,
    Json(request): Json<ExportRequest>,
) -> Result<Json<ApiResponse<ExportDocument>>, RestError> {
    let document = handler.export(&request).await?;
    Ok(Json(ApiResponse::success(document)))
}

/// Send the archive as an attachment, or `{status: false, messages}` when
/// the query was aborted or failed.
pub async fn download(
    Extension(handler): Extension<Arc<Handler>>,
    Json(request): Json<DownloadRequest>,
) -> Result<Response, RestError> {
    let payload = match handler.download(&request).await {
        Ok(payload) => payload,
        Err(e) => {
            tracing::info!(error = %e, "download aborted");
            let body = DownloadAbortDto {
                status: false,
                messages: render_messages(&e.messages()),
            };
            return Ok(Json(body).into_response());
        }
    };

    let mut headers = HeaderMap::new();
    for (name, value) in payload.headers() {
        let name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| RestError::internal(e.to_string()))?;
        let value = HeaderValue::from_str(&value).map_err(|e| RestError::internal(e.to_string()))?;
        headers.insert(name, value);
    }
    Ok((headers, payload.bytes).into_response())
}
