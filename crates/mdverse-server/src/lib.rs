// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;
use mdverse_api::ApiError;
use mdverse_query::QueryError;
use std::sync::atomic::{AtomicBool, AtomicU64};
use std::sync::Arc;
use std::time::Duration;
use tower_http::services::ServeDir;

mod config;
mod db;
mod http;
mod middleware;
mod render;

pub use config::{validate_startup_config, ServerConfig};
pub use db::CatalogDb;
pub use middleware::request_tracing::RequestId;
pub use render::charts::{stacked_bar_chart, ChartSeries, ChartSpec, REPOSITORY_SERIES};
pub use render::html::escape_html;
pub use render::wordcloud::{ensure_wordcloud, title_word_frequencies, WORDCLOUD_FILE};

pub const CRATE_NAME: &str = "mdverse-server";

#[derive(Debug)]
#[non_exhaustive]
pub enum ServerError {
    Config(String),
    Database(String),
    Query(QueryError),
    Timeout(Duration),
    Io(String),
    Internal(String),
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Database(msg) => write!(f, "database: {msg}"),
            Self::Query(err) => write!(f, "query: {err}"),
            Self::Timeout(limit) => write!(f, "query exceeded {} ms", limit.as_millis()),
            Self::Io(msg) => write!(f, "io: {msg}"),
            Self::Internal(msg) => write!(f, "internal: {msg}"),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<QueryError> for ServerError {
    fn from(err: QueryError) -> Self {
        Self::Query(err)
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<ServerError> for ApiError {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::Query(e) => ApiError::from(e),
            ServerError::Timeout(_) => ApiError::not_ready(err.to_string()),
            other => ApiError::internal(other.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<CatalogDb>,
    pub config: Arc<ServerConfig>,
    pub request_id_seed: Arc<AtomicU64>,
    pub accepting_requests: Arc<AtomicBool>,
}

impl AppState {
    #[must_use]
    pub fn new(db: Arc<CatalogDb>, config: ServerConfig) -> Self {
        Self {
            db,
            config: Arc::new(config),
            request_id_seed: Arc::new(AtomicU64::new(1)),
            accepting_requests: Arc::new(AtomicBool::new(true)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(http::pages::index_handler))
        .route("/healthz", get(http::pages::healthz_handler))
        .route("/datasets", get(http::pages::datasets_page_handler))
        .route(
            "/datasets/:dataset_id",
            get(http::datasets::dataset_detail_handler),
        )
        .route(
            "/datasets/:dataset_id/files",
            get(http::datasets::dataset_files_handler),
        )
        .route(
            "/datasets/:dataset_id/files/all",
            get(http::datasets::dataset_all_files_fragment),
        )
        .route(
            "/datasets/:dataset_id/files/top_files",
            get(http::datasets::dataset_topology_fragment),
        )
        .route(
            "/datasets/:dataset_id/files/param_files",
            get(http::datasets::dataset_parameter_fragment),
        )
        .route(
            "/datasets/:dataset_id/files/traj_files",
            get(http::datasets::dataset_trajectory_fragment),
        )
        .route("/file_types", get(http::file_types::file_types_handler))
        .route(
            "/file_types/:file_type/download_info",
            get(http::file_types::download_info_handler),
        )
        .route(
            "/file_types/:file_type/download_list/",
            get(http::file_types::download_list_handler),
        )
        .route("/gro_files", get(http::pages::gro_files_page_handler))
        .route("/mdp_files", get(http::pages::mdp_files_page_handler))
        .route("/xtc_files", get(http::pages::xtc_files_page_handler))
        .route(
            "/all_mdp_files_data",
            get(http::grids::all_parameter_files_handler),
        )
        .route("/datatables/datasets", get(http::grids::datasets_grid_handler))
        .route(
            "/datatables/gro_files",
            get(http::grids::topology_grid_handler),
        )
        .route(
            "/datatables/mdp_files",
            get(http::grids::parameter_grid_handler),
        )
        .route(
            "/datatables/xtc_files",
            get(http::grids::trajectory_grid_handler),
        )
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::request_tracing::request_tracing_middleware,
        ))
        .with_state(state)
}
