// SPDX-License-Identifier: Apache-2.0

use crate::render::html;
use crate::{RequestId, ServerError};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use mdverse_api::{status_code, ApiError};
use serde_json::json;
use tracing::{error, warn};

pub(crate) fn api_error_response(status: StatusCode, err: ApiError) -> Response {
    let body = Json(json!({"error": err}));
    (status, body).into_response()
}

/// JSON error envelope with the status its code maps to.
pub(crate) fn api_failure(err: impl Into<ApiError>, request_id: &RequestId) -> Response {
    let err = err.into().with_request_id(request_id.0.clone());
    let status =
        StatusCode::from_u16(status_code(&err)).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(code = ?err.code, message = %err.message, "request failed");
    } else {
        warn!(code = ?err.code, message = %err.message, "request rejected");
    }
    api_error_response(status, err)
}

pub(crate) fn html_ok(body: String) -> Response {
    Html(body).into_response()
}

pub(crate) fn html_not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Html(html::not_found_page(message))).into_response()
}

pub(crate) fn html_failure(err: ServerError) -> Response {
    error!(error = %err, "page rendering failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(html::error_page("The catalog could not be queried.")),
    )
        .into_response()
}
