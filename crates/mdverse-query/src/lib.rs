// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

//! Read-only, parametrized queries over the MDverse catalog database.

mod datasets;
mod detail_files;
mod file_types;
mod filters;
mod grid;
mod limits;
mod query_error;
mod schema;
mod summary;

pub const CRATE_NAME: &str = "mdverse-query";

pub use datasets::{
    count_datasets, dataset_analysed_counts, dataset_by_id, dataset_file_counts, datasets_grid,
    files_in_dataset, DATASETS_DEFAULT_SORT, DATASETS_TABLE,
};
pub use detail_files::{
    all_parameter_files, count_parameter_files, count_topology_files, count_trajectory_files,
    parameter_files, topology_files, trajectory_files, PARAMETER_DEFAULT_SORT, PARAMETER_TABLE,
    TOPOLOGY_DEFAULT_SORT, TOPOLOGY_TABLE, TRAJECTORY_DEFAULT_SORT, TRAJECTORY_TABLE,
};
pub use file_types::{file_type_exists, file_type_stats, files_for_file_type};
pub use filters::{escape_like, fold_search_text, register_search_functions, SEARCH_FOLD_FUNCTION};
pub use grid::{GridColumn, GridQuery, GridSort, GridTable, SortDirection};
pub use limits::QueryLimits;
pub use query_error::{QueryError, QueryErrorCode};
pub use schema::{verify_schema, REFERENCE_SCHEMA_SQL, REQUIRED_TABLES};
pub use summary::{
    dataset_origin_summary, dataset_titles, yearly_dataset_counts_for_origin,
    yearly_file_counts_for_origin,
};
