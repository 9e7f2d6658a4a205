// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Catalog model shared by the query, api and server crates.

mod dataset;
mod file_kind;
mod format;
mod rows;

pub use dataset::{DatasetId, ValidationError};
pub use file_kind::FileKind;
pub use format::{format_gigabytes, format_thousands, BYTES_PER_GIGABYTE};
pub use rows::{
    DatasetAnalysedCounts, DatasetDetail, DatasetFileCounts, DatasetFileRow, DatasetGridRow,
    FileListingRow, FileTypeStatsRow, OriginSummaryRow, OriginSummaryTotals, ParameterFileRow,
    TopologyFileRow, TrajectoryFileRow, YearlyCounts, FILE_LISTING_TSV_HEADER,
};

pub const CRATE_NAME: &str = "mdverse-model";
