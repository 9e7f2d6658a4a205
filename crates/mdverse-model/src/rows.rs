// SPDX-License-Identifier: Apache-2.0

use crate::format::{format_gigabytes, format_thousands};
use serde::Serialize;
use std::collections::BTreeMap;

/// Count per calendar year.
pub type YearlyCounts = BTreeMap<i32, u64>;

pub const FILE_LISTING_TSV_HEADER: [&str; 7] = [
    "dataset_id",
    "dataset_origin",
    "file_name",
    "file_size_in_bytes",
    "is_file_from_zip_file",
    "file_url",
    "dataset_url",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OriginSummaryRow {
    pub dataset_origin: String,
    pub number_of_datasets: u64,
    pub first_dataset: Option<String>,
    pub last_dataset: Option<String>,
    pub non_zip_files: u64,
    pub total_size_in_gb: f64,
    pub zip_files: u64,
    pub files_within_zip_files: u64,
    pub total_files: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct OriginSummaryTotals {
    pub number_of_datasets: u64,
    pub first_dataset: Option<String>,
    pub last_dataset: Option<String>,
    pub non_zip_files: u64,
    pub zip_files: u64,
    pub files_within_zip_files: u64,
    pub total_files: u64,
    pub total_size_in_gb: f64,
    pub analysed_files: u64,
}

impl OriginSummaryTotals {
    /// Dates are ISO-8601 strings, so lexical min/max is chronological.
    #[must_use]
    pub fn from_rows(rows: &[OriginSummaryRow], analysed_files: u64) -> Self {
        let mut totals = Self {
            analysed_files,
            ..Self::default()
        };
        for row in rows {
            totals.number_of_datasets += row.number_of_datasets;
            totals.non_zip_files += row.non_zip_files;
            totals.zip_files += row.zip_files;
            totals.files_within_zip_files += row.files_within_zip_files;
            totals.total_files += row.total_files;
            totals.total_size_in_gb += row.total_size_in_gb;
            if let Some(first) = &row.first_dataset {
                if totals.first_dataset.as_ref().is_none_or(|cur| first < cur) {
                    totals.first_dataset = Some(first.clone());
                }
            }
            if let Some(last) = &row.last_dataset {
                if totals.last_dataset.as_ref().is_none_or(|cur| last > cur) {
                    totals.last_dataset = Some(last.clone());
                }
            }
        }
        totals
    }

    /// Label/value pairs in display order for the index summary.
    #[must_use]
    pub fn labelled(&self) -> Vec<(&'static str, String)> {
        vec![
            (
                "Number of datasets",
                format_thousands(self.number_of_datasets),
            ),
            (
                "First dataset",
                self.first_dataset.clone().unwrap_or_default(),
            ),
            ("Last dataset", self.last_dataset.clone().unwrap_or_default()),
            ("Non-zip files", format_thousands(self.non_zip_files)),
            ("Zip files", format_thousands(self.zip_files)),
            (
                "Files in zip files",
                format_thousands(self.files_within_zip_files),
            ),
            ("Total files", format_thousands(self.total_files)),
            (
                "Total size in GB for non-zip and zip files",
                format_gigabytes(self.total_size_in_gb),
            ),
            ("Analysed files", format_thousands(self.analysed_files)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileTypeStatsRow {
    pub file_type: String,
    pub number_of_files: u64,
    pub number_of_datasets: u64,
    pub total_size_in_gb: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileListingRow {
    pub dataset_id: String,
    pub dataset_origin: String,
    pub file_name: String,
    pub file_size_in_bytes: Option<i64>,
    pub is_file_from_zip_file: bool,
    pub file_url: Option<String>,
    pub dataset_url: Option<String>,
}

impl FileListingRow {
    /// Fields in `FILE_LISTING_TSV_HEADER` order; tabs and newlines become spaces.
    #[must_use]
    pub fn tsv_fields(&self) -> [String; 7] {
        [
            tsv_clean(&self.dataset_id),
            tsv_clean(&self.dataset_origin),
            tsv_clean(&self.file_name),
            self.file_size_in_bytes
                .map(|v| v.to_string())
                .unwrap_or_default(),
            if self.is_file_from_zip_file {
                "True".to_string()
            } else {
                "False".to_string()
            },
            self.file_url.as_deref().map(tsv_clean).unwrap_or_default(),
            self.dataset_url
                .as_deref()
                .map(tsv_clean)
                .unwrap_or_default(),
        ]
    }
}

fn tsv_clean(value: &str) -> String {
    value.replace(['\t', '\n', '\r'], " ")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetGridRow {
    pub dataset_origin: String,
    pub dataset_id_in_origin: String,
    pub dataset_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub date_created: Option<String>,
    pub date_last_modified: Option<String>,
    pub file_number: Option<i64>,
    pub download_number: Option<i64>,
    pub view_number: Option<i64>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetDetail {
    pub dataset_id: i64,
    pub dataset_origin: String,
    pub id_in_origin: String,
    pub title: String,
    pub description: Option<String>,
    pub date_created: Option<String>,
    pub date_last_modified: Option<String>,
    pub file_number: Option<i64>,
    pub download_number: Option<i64>,
    pub view_number: Option<i64>,
    pub url: Option<String>,
    pub authors: Vec<String>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct DatasetFileCounts {
    pub total_all_files: u64,
    pub total_topology_files: u64,
    pub total_parameter_files: u64,
    pub total_trajectory_files: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct DatasetAnalysedCounts {
    pub analysed_topology_files: u64,
    pub analysed_parameter_files: u64,
    pub analysed_trajectory_files: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetFileRow {
    pub file_id: i64,
    pub file_name: String,
    pub file_type: String,
    pub size_in_bytes: Option<i64>,
    pub is_from_zip_file: bool,
    pub url: Option<String>,
    pub dataset_id_in_origin: String,
    pub dataset_origin: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopologyFileRow {
    pub atom_number: Option<i64>,
    pub has_protein: Option<bool>,
    pub has_nucleic: Option<bool>,
    pub has_lipid: Option<bool>,
    pub has_glucid: Option<bool>,
    pub has_water_ion: Option<bool>,
    pub file_name: String,
    pub dataset_id_in_origin: String,
    pub dataset_url: Option<String>,
    pub dataset_origin: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterFileRow {
    pub dt: Option<f64>,
    pub nsteps: Option<i64>,
    pub temperature: Option<f64>,
    pub thermostat_name: Option<String>,
    pub barostat_name: Option<String>,
    pub integrator_name: Option<String>,
    pub file_name: String,
    pub dataset_id_in_origin: String,
    pub dataset_url: Option<String>,
    pub dataset_origin: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrajectoryFileRow {
    pub atom_number: Option<i64>,
    pub frame_number: Option<i64>,
    pub file_name: String,
    pub dataset_id_in_origin: String,
    pub dataset_url: Option<String>,
    pub dataset_origin: String,
}
