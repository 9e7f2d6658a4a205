// SPDX-License-Identifier: Apache-2.0

use crate::http::response::api_failure;
use crate::{AppState, RequestId};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use mdverse_api::{parse_grid_params, GridResponse};
use mdverse_query::{
    all_parameter_files, count_datasets, count_parameter_files, count_topology_files,
    count_trajectory_files, datasets_grid, parameter_files, topology_files, trajectory_files,
    GridQuery, QueryError, QueryLimits, DATASETS_DEFAULT_SORT, PARAMETER_DEFAULT_SORT,
    TOPOLOGY_DEFAULT_SORT, TRAJECTORY_DEFAULT_SORT,
};
use rusqlite::Connection;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

type CountFn = fn(&Connection, Option<&str>) -> Result<u64, QueryError>;
type FetchFn<T> = fn(&Connection, &GridQuery, &QueryLimits) -> Result<Vec<T>, QueryError>;

/// Runs one grid request: unfiltered total, filtered total, then the page.
async fn grid_json<T>(
    state: &AppState,
    request_id: &RequestId,
    params: &BTreeMap<String, String>,
    default_sort: &str,
    count: CountFn,
    fetch: FetchFn<T>,
) -> Response
where
    T: Serialize + Send + 'static,
{
    let limits = state.config.limits.clone();
    let parsed = match parse_grid_params(params, default_sort, &limits) {
        Ok(parsed) => parsed,
        Err(err) => return api_failure(err, request_id),
    };
    let query = parsed.query;
    let result = state
        .db
        .run(move |conn| {
            let total = count(conn, None)?;
            let filtered = count(conn, query.effective_search())?;
            let rows = fetch(conn, &query, &limits)?;
            Ok::<_, QueryError>((total, filtered, rows))
        })
        .await;
    match result {
        Ok((total, filtered, rows)) => {
            debug!(total, filtered, returned = rows.len(), "grid page served");
            Json(GridResponse::new(parsed.draw, total, filtered, rows)).into_response()
        }
        Err(err) => api_failure(err, request_id),
    }
}

pub(crate) async fn datasets_grid_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Response {
    grid_json(
        &state,
        &request_id,
        &params,
        DATASETS_DEFAULT_SORT,
        count_datasets,
        datasets_grid,
    )
    .await
}

pub(crate) async fn topology_grid_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Response {
    grid_json(
        &state,
        &request_id,
        &params,
        TOPOLOGY_DEFAULT_SORT,
        |conn, search| count_topology_files(conn, None, search),
        |conn, query, limits| topology_files(conn, None, query, limits),
    )
    .await
}

pub(crate) async fn parameter_grid_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Response {
    grid_json(
        &state,
        &request_id,
        &params,
        PARAMETER_DEFAULT_SORT,
        |conn, search| count_parameter_files(conn, None, search),
        |conn, query, limits| parameter_files(conn, None, query, limits),
    )
    .await
}

pub(crate) async fn trajectory_grid_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Response {
    grid_json(
        &state,
        &request_id,
        &params,
        TRAJECTORY_DEFAULT_SORT,
        |conn, search| count_trajectory_files(conn, None, search),
        |conn, query, limits| trajectory_files(conn, None, query, limits),
    )
    .await
}

pub(crate) async fn all_parameter_files_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Response {
    match state.db.run(all_parameter_files).await {
        Ok(rows) => Json(rows).into_response(),
        Err(err) => api_failure(err, &request_id),
    }
}
