// SPDX-License-Identifier: Apache-2.0

mod support;

use mdverse_query::{
    dataset_origin_summary, dataset_titles, file_type_exists, file_type_stats,
    files_for_file_type, verify_schema, yearly_dataset_counts_for_origin,
    yearly_file_counts_for_origin,
};
use std::collections::BTreeMap;

#[test]
fn seeded_catalog_passes_schema_check() {
    let conn = support::catalog();
    verify_schema(&conn).expect("schema");
}

#[test]
fn origin_summary_counts_files_by_zip_status() {
    let conn = support::catalog();
    let (rows, totals) = dataset_origin_summary(&conn).expect("summary");
    let origins = rows.iter().map(|r| r.dataset_origin.as_str()).collect::<Vec<_>>();
    assert_eq!(origins, vec!["figshare", "osf", "zenodo"]);

    let figshare = &rows[0];
    assert_eq!(figshare.number_of_datasets, 1);
    assert_eq!(figshare.total_files, 0);
    assert_eq!(figshare.first_dataset.as_deref(), Some("2021-11-30"));

    let zenodo = &rows[2];
    assert_eq!(zenodo.number_of_datasets, 2);
    assert_eq!(zenodo.non_zip_files, 3);
    assert_eq!(zenodo.zip_files, 1);
    assert_eq!(zenodo.files_within_zip_files, 1);
    assert_eq!(zenodo.total_files, 5);
    assert_eq!(zenodo.first_dataset.as_deref(), Some("2019-03-01"));
    assert_eq!(zenodo.last_dataset.as_deref(), Some("2021-06-15"));
    assert!((zenodo.total_size_in_gb - 2.000_004_5).abs() < 1e-9);

    assert_eq!(totals.number_of_datasets, 4);
    assert_eq!(totals.total_files, 6);
    assert_eq!(totals.analysed_files, 4);
    assert_eq!(totals.first_dataset.as_deref(), Some("2019-03-01"));
    assert_eq!(totals.last_dataset.as_deref(), Some("2021-11-30"));
}

#[test]
fn titles_follow_dataset_order() {
    let conn = support::catalog();
    let titles = dataset_titles(&conn).expect("titles");
    assert_eq!(titles.len(), 4);
    assert_eq!(titles[0], "Lipid bilayer membrane simulation");
}

#[test]
fn yearly_counts_group_by_creation_year() {
    let conn = support::catalog();
    let files = yearly_file_counts_for_origin(&conn, "zenodo").expect("files");
    assert_eq!(files, BTreeMap::from([(2019, 3), (2021, 2)]));
    let datasets = yearly_dataset_counts_for_origin(&conn, "zenodo").expect("datasets");
    assert_eq!(datasets, BTreeMap::from([(2019, 1), (2021, 1)]));

    assert!(yearly_file_counts_for_origin(&conn, "figshare")
        .expect("no files")
        .is_empty());
    assert_eq!(
        yearly_dataset_counts_for_origin(&conn, "figshare").expect("datasets"),
        BTreeMap::from([(2021, 1)])
    );
    assert!(yearly_dataset_counts_for_origin(&conn, "unknown")
        .expect("unknown origin")
        .is_empty());
}

#[test]
fn file_type_stats_order_by_file_count_then_name() {
    let conn = support::catalog();
    let stats = file_type_stats(&conn).expect("stats");
    let names = stats.iter().map(|s| s.file_type.as_str()).collect::<Vec<_>>();
    assert_eq!(names, vec!["gro", "mdp", "txt", "xtc", "zip"]);
    assert_eq!(stats[0].number_of_files, 2);
    assert_eq!(stats[0].number_of_datasets, 2);
    assert!((stats[0].total_size_in_gb - 1.8e-6).abs() < 1e-12);
}

#[test]
fn archived_files_list_the_archive_url() {
    let conn = support::catalog();
    assert!(file_type_exists(&conn, "gro").expect("lookup"));
    assert!(!file_type_exists(&conn, "pdb").expect("lookup"));

    let listing = files_for_file_type(&conn, "gro").expect("listing");
    assert_eq!(listing.len(), 2);
    assert_eq!(listing[0].dataset_id, "1001");
    assert_eq!(listing[0].file_name, "membrane.gro");
    assert!(!listing[0].is_file_from_zip_file);
    assert_eq!(listing[1].file_name, "protein.gro");
    assert!(listing[1].is_file_from_zip_file);
    assert_eq!(
        listing[1].file_url.as_deref(),
        Some("https://zenodo.org/record/1002/files/archive.zip")
    );
    assert!(files_for_file_type(&conn, "pdb").expect("empty").is_empty());
}
