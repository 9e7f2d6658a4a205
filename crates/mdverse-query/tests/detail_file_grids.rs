// SPDX-License-Identifier: Apache-2.0

mod support;

use mdverse_model::DatasetId;
use mdverse_query::{
    all_parameter_files, count_parameter_files, count_topology_files, count_trajectory_files,
    parameter_files, topology_files, trajectory_files, GridQuery, QueryLimits, SortDirection,
    TOPOLOGY_DEFAULT_SORT,
};

#[test]
fn topology_grid_sorts_and_scopes_to_dataset() {
    let conn = support::catalog();
    let limits = QueryLimits::default();
    let query = GridQuery::sorted_by(TOPOLOGY_DEFAULT_SORT, SortDirection::Asc);
    let rows = topology_files(&conn, None, &query, &limits).expect("grid");
    let atoms = rows.iter().map(|r| r.atom_number).collect::<Vec<_>>();
    assert_eq!(atoms, vec![Some(600), Some(12000)]);
    assert_eq!(rows[0].has_protein, Some(true));
    assert_eq!(rows[1].has_lipid, Some(true));

    let scoped = DatasetId::new(1).expect("id");
    let rows = topology_files(&conn, Some(scoped), &query, &limits).expect("grid");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].file_name, "membrane.gro");
    assert_eq!(count_topology_files(&conn, Some(scoped), None).expect("count"), 1);
    assert_eq!(count_topology_files(&conn, None, None).expect("count"), 2);
}

#[test]
fn topology_search_matches_boolean_words() {
    let conn = support::catalog();
    assert_eq!(count_topology_files(&conn, None, Some("true")).expect("count"), 2);
    assert_eq!(count_topology_files(&conn, None, Some("membrane")).expect("count"), 1);
    assert_eq!(count_topology_files(&conn, None, Some("nothing-like-this")).expect("count"), 0);
}

#[test]
fn parameter_rows_carry_algorithm_names() {
    let conn = support::catalog();
    let rows = parameter_files(&conn, None, &GridQuery::default(), &QueryLimits::default())
        .expect("grid");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].thermostat_name.as_deref(), Some("V-rescale"));
    assert_eq!(rows[0].barostat_name.as_deref(), Some("Parrinello-Rahman"));
    assert_eq!(rows[0].nsteps, Some(500_000));
    assert_eq!(count_parameter_files(&conn, None, Some("rescale")).expect("count"), 1);
    assert_eq!(all_parameter_files(&conn).expect("all").len(), 1);
}

#[test]
fn trajectory_rows_and_counts() {
    let conn = support::catalog();
    let rows = trajectory_files(&conn, None, &GridQuery::default(), &QueryLimits::default())
        .expect("grid");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].frame_number, Some(1001));
    assert_eq!(rows[0].dataset_origin, "zenodo");
    let other = DatasetId::new(2).expect("id");
    assert_eq!(count_trajectory_files(&conn, Some(other), None).expect("count"), 0);
}

#[test]
fn oversized_page_is_rejected() {
    let conn = support::catalog();
    let limits = QueryLimits {
        max_page_length: 1,
        ..QueryLimits::default()
    };
    let query = GridQuery {
        length: Some(2),
        ..GridQuery::default()
    };
    assert!(trajectory_files(&conn, None, &query, &limits).is_err());
}
