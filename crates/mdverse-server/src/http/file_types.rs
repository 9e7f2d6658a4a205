// SPDX-License-Identifier: Apache-2.0

use crate::http::response::{api_failure, html_failure, html_ok};
use crate::render::html;
use crate::{AppState, RequestId};
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use mdverse_api::ApiError;
use mdverse_model::FILE_LISTING_TSV_HEADER;
use mdverse_query::{file_type_exists, file_type_stats, files_for_file_type, QueryError};
use tracing::info;

pub(crate) const TSV_CONTENT_TYPE: &str = "text/tab-separated-values; charset=utf-8";

pub(crate) async fn file_types_handler(State(state): State<AppState>) -> Response {
    match state.db.run(file_type_stats).await {
        Ok(stats) => html_ok(html::file_types_page(&stats)),
        Err(err) => html_failure(err),
    }
}

pub(crate) async fn download_info_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(file_type): Path<String>,
) -> Response {
    let lookup = file_type.clone();
    let found = state
        .db
        .run(move |conn| {
            if !file_type_exists(conn, &lookup)? {
                return Ok::<_, QueryError>(None);
            }
            let files = file_type_stats(conn)?
                .into_iter()
                .find(|row| row.file_type == lookup)
                .map_or(0, |row| row.number_of_files);
            Ok(Some(files))
        })
        .await;
    match found {
        Ok(Some(files)) => html_ok(html::download_info_fragment(
            &file_type,
            usize::try_from(files).unwrap_or(usize::MAX),
        )),
        Ok(None) => api_failure(ApiError::file_type_not_found(&file_type), &request_id),
        Err(err) => api_failure(err, &request_id),
    }
}

fn tsv_body(rows: &[mdverse_model::FileListingRow]) -> String {
    let mut out = FILE_LISTING_TSV_HEADER.join("\t");
    out.push('\n');
    for row in rows {
        out.push_str(&row.tsv_fields().join("\t"));
        out.push('\n');
    }
    out
}

pub(crate) async fn download_list_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(file_type): Path<String>,
) -> Response {
    let lookup = file_type.clone();
    let listed = state
        .db
        .run(move |conn| {
            if !file_type_exists(conn, &lookup)? {
                return Ok::<_, QueryError>(None);
            }
            files_for_file_type(conn, &lookup).map(Some)
        })
        .await;
    let rows = match listed {
        Ok(Some(rows)) => rows,
        Ok(None) => {
            return api_failure(ApiError::file_type_not_found(&file_type), &request_id);
        }
        Err(err) => return api_failure(err, &request_id),
    };
    info!(file_type = %file_type, rows = rows.len(), "file listing exported");

    let disposition = format!("attachment; filename=\"mdverse_{file_type}.tsv\"");
    let mut response = (StatusCode::OK, tsv_body(&rows)).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(TSV_CONTENT_TYPE),
    );
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    response
}
