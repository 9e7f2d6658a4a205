// SPDX-License-Identifier: Apache-2.0

use crate::http::response::{html_failure, html_ok};
use crate::render::charts::{repository_chart, stacked_bar_chart};
use crate::render::html::{self, IndexView};
use crate::render::wordcloud::{ensure_wordcloud, WORDCLOUD_FILE};
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mdverse_model::{OriginSummaryRow, OriginSummaryTotals, YearlyCounts};
use mdverse_query::{
    dataset_origin_summary, yearly_dataset_counts_for_origin, yearly_file_counts_for_origin,
    QueryError,
};
use std::collections::BTreeMap;
use std::sync::atomic::Ordering;
use tracing::{info, warn};

pub(crate) const FILES_CHART_TITLE: &str = "Number of files per year per data repository";
pub(crate) const DATASETS_CHART_TITLE: &str = "Number of datasets per year per data repository";

pub(crate) const DATASET_GRID_COLUMNS: [(&str, &str); 8] = [
    ("dataset_origin", "Data repository"),
    ("dataset_id_in_origin", "Identifier"),
    ("title", "Title"),
    ("date_created", "Created"),
    ("date_last_modified", "Last modified"),
    ("file_number", "Files"),
    ("download_number", "Downloads"),
    ("view_number", "Views"),
];

pub(crate) const TOPOLOGY_GRID_COLUMNS: [(&str, &str); 9] = [
    ("dataset_origin", "Data repository"),
    ("dataset_id_in_origin", "Dataset"),
    ("file_name", "File name"),
    ("atom_number", "Atoms"),
    ("has_protein", "Protein"),
    ("has_nucleic", "Nucleic acid"),
    ("has_lipid", "Lipid"),
    ("has_glucid", "Glucid"),
    ("has_water_ion", "Water/ion"),
];

pub(crate) const PARAMETER_GRID_COLUMNS: [(&str, &str); 9] = [
    ("dataset_origin", "Data repository"),
    ("dataset_id_in_origin", "Dataset"),
    ("file_name", "File name"),
    ("dt", "dt (ps)"),
    ("nsteps", "Steps"),
    ("temperature", "Temperature (K)"),
    ("thermostat_name", "Thermostat"),
    ("barostat_name", "Barostat"),
    ("integrator_name", "Integrator"),
];

pub(crate) const TRAJECTORY_GRID_COLUMNS: [(&str, &str); 5] = [
    ("dataset_origin", "Data repository"),
    ("dataset_id_in_origin", "Dataset"),
    ("file_name", "File name"),
    ("atom_number", "Atoms"),
    ("frame_number", "Frames"),
];

struct IndexData {
    rows: Vec<OriginSummaryRow>,
    totals: OriginSummaryTotals,
    files_per_year: BTreeMap<String, YearlyCounts>,
    datasets_per_year: BTreeMap<String, YearlyCounts>,
}

fn load_index(conn: &rusqlite::Connection) -> Result<IndexData, QueryError> {
    let (rows, totals) = dataset_origin_summary(conn)?;
    let mut files_per_year = BTreeMap::new();
    let mut datasets_per_year = BTreeMap::new();
    for (origin, _, _) in crate::REPOSITORY_SERIES {
        files_per_year.insert(origin.to_string(), yearly_file_counts_for_origin(conn, origin)?);
        datasets_per_year.insert(
            origin.to_string(),
            yearly_dataset_counts_for_origin(conn, origin)?,
        );
    }
    Ok(IndexData {
        rows,
        totals,
        files_per_year,
        datasets_per_year,
    })
}

pub(crate) async fn index_handler(State(state): State<AppState>) -> Response {
    let static_dir = state.config.static_dir.clone();
    let loaded = state
        .db
        .run(move |conn| {
            let data = load_index(conn)?;
            // Regenerated here when the file was removed after startup.
            let wordcloud = match ensure_wordcloud(conn, &static_dir) {
                Ok(generated) => {
                    if generated {
                        info!("word cloud regenerated");
                    }
                    true
                }
                Err(err) => {
                    warn!("word cloud unavailable: {err}");
                    false
                }
            };
            Ok::<_, QueryError>((data, wordcloud))
        })
        .await;
    let (data, wordcloud) = match loaded {
        Ok(loaded) => loaded,
        Err(err) => return html_failure(err),
    };
    let files_chart = stacked_bar_chart(&repository_chart(
        FILES_CHART_TITLE,
        "Number of files",
        |origin| data.files_per_year.get(origin).cloned().unwrap_or_default(),
    ));
    let datasets_chart = stacked_bar_chart(&repository_chart(
        DATASETS_CHART_TITLE,
        "Number of datasets",
        |origin| data.datasets_per_year.get(origin).cloned().unwrap_or_default(),
    ));
    let wordcloud_url = wordcloud.then(|| format!("/static/{WORDCLOUD_FILE}"));
    html_ok(html::index_page(&IndexView {
        rows: &data.rows,
        totals: &data.totals,
        files_chart: &files_chart,
        datasets_chart: &datasets_chart,
        wordcloud_url: wordcloud_url.as_deref(),
    }))
}

pub(crate) async fn healthz_handler(State(state): State<AppState>) -> impl IntoResponse {
    if state.accepting_requests.load(Ordering::Relaxed) {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "draining")
    }
}

pub(crate) async fn datasets_page_handler() -> Response {
    html_ok(html::grid_page(
        "Datasets",
        "datasets",
        "/datatables/datasets",
        &DATASET_GRID_COLUMNS,
    ))
}

pub(crate) async fn gro_files_page_handler() -> Response {
    html_ok(html::grid_page(
        ".gro files",
        "gro-files",
        "/datatables/gro_files",
        &TOPOLOGY_GRID_COLUMNS,
    ))
}

pub(crate) async fn mdp_files_page_handler() -> Response {
    html_ok(html::grid_page(
        ".mdp files",
        "mdp-files",
        "/datatables/mdp_files",
        &PARAMETER_GRID_COLUMNS,
    ))
}

pub(crate) async fn xtc_files_page_handler() -> Response {
    html_ok(html::grid_page(
        ".xtc files",
        "xtc-files",
        "/datatables/xtc_files",
        &TRAJECTORY_GRID_COLUMNS,
    ))
}
