// SPDX-License-Identifier: Apache-2.0

use crate::http::response::{html_failure, html_not_found, html_ok};
use crate::render::html;
use crate::AppState;
use axum::extract::{Path, State};
use axum::response::Response;
use mdverse_model::DatasetId;
use mdverse_query::{
    dataset_analysed_counts, dataset_by_id, dataset_file_counts, files_in_dataset,
    parameter_files, topology_files, trajectory_files, GridQuery, QueryError, SortDirection,
    PARAMETER_DEFAULT_SORT, TOPOLOGY_DEFAULT_SORT, TRAJECTORY_DEFAULT_SORT,
};

fn dataset_id_or_404(raw: &str) -> Result<DatasetId, Response> {
    DatasetId::parse(raw).map_err(|err| html_not_found(&err.to_string()))
}

fn missing_dataset(id: DatasetId) -> Response {
    html_not_found(&format!("No dataset with id {id}."))
}

pub(crate) async fn dataset_detail_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Response {
    let id = match dataset_id_or_404(&raw_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match state.db.run(move |conn| dataset_by_id(conn, id)).await {
        Ok(Some(detail)) => html_ok(html::dataset_detail_page(&detail)),
        Ok(None) => missing_dataset(id),
        Err(err) => html_failure(err),
    }
}

pub(crate) async fn dataset_files_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Response {
    let id = match dataset_id_or_404(&raw_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let loaded = state
        .db
        .run(move |conn| {
            let Some(detail) = dataset_by_id(conn, id)? else {
                return Ok::<_, QueryError>(None);
            };
            let totals = dataset_file_counts(conn, id)?;
            let analysed = dataset_analysed_counts(conn, id)?;
            Ok(Some((detail, totals, analysed)))
        })
        .await;
    match loaded {
        Ok(Some((detail, totals, analysed))) => {
            html_ok(html::dataset_files_page(&detail, &totals, &analysed))
        }
        Ok(None) => missing_dataset(id),
        Err(err) => html_failure(err),
    }
}

pub(crate) async fn dataset_all_files_fragment(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Response {
    let id = match dataset_id_or_404(&raw_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match state.db.run(move |conn| files_in_dataset(conn, id)).await {
        Ok(files) => html_ok(html::all_files_fragment(&files)),
        Err(err) => html_failure(err),
    }
}

pub(crate) async fn dataset_topology_fragment(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Response {
    let id = match dataset_id_or_404(&raw_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let limits = state.config.limits.clone();
    let query = GridQuery::sorted_by(TOPOLOGY_DEFAULT_SORT, SortDirection::Asc);
    match state
        .db
        .run(move |conn| topology_files(conn, Some(id), &query, &limits))
        .await
    {
        Ok(files) => html_ok(html::topology_fragment(&files)),
        Err(err) => html_failure(err),
    }
}

pub(crate) async fn dataset_parameter_fragment(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Response {
    let id = match dataset_id_or_404(&raw_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let limits = state.config.limits.clone();
    let query = GridQuery::sorted_by(PARAMETER_DEFAULT_SORT, SortDirection::Asc);
    match state
        .db
        .run(move |conn| parameter_files(conn, Some(id), &query, &limits))
        .await
    {
        Ok(files) => html_ok(html::parameter_fragment(&files)),
        Err(err) => html_failure(err),
    }
}

pub(crate) async fn dataset_trajectory_fragment(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Response {
    let id = match dataset_id_or_404(&raw_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let limits = state.config.limits.clone();
    let query = GridQuery::sorted_by(TRAJECTORY_DEFAULT_SORT, SortDirection::Asc);
    match state
        .db
        .run(move |conn| trajectory_files(conn, Some(id), &query, &limits))
        .await
    {
        Ok(files) => html_ok(html::trajectory_fragment(&files)),
        Err(err) => html_failure(err),
    }
}
