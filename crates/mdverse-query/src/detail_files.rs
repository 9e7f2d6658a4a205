// SPDX-License-Identifier: Apache-2.0

//! Grids over analysed files: topology (`gro`), parameter (`mdp`) and
//! trajectory (`xtc`) detail rows joined with their file and dataset.

use crate::grid::{GridColumn, GridQuery, GridTable};
use crate::limits::QueryLimits;
use crate::query_error::QueryError;
use mdverse_model::{DatasetId, ParameterFileRow, TopologyFileRow, TrajectoryFileRow};
use rusqlite::{Connection, Row};

const TOPOLOGY_COLUMNS: [GridColumn; 10] = [
    GridColumn::searchable("atom_number", "t.atom_number", "CAST(t.atom_number AS TEXT)"),
    GridColumn::searchable(
        "has_protein",
        "t.has_protein",
        "CASE t.has_protein WHEN 1 THEN 'true' WHEN 0 THEN 'false' END",
    ),
    GridColumn::searchable(
        "has_nucleic",
        "t.has_nucleic",
        "CASE t.has_nucleic WHEN 1 THEN 'true' WHEN 0 THEN 'false' END",
    ),
    GridColumn::searchable(
        "has_lipid",
        "t.has_lipid",
        "CASE t.has_lipid WHEN 1 THEN 'true' WHEN 0 THEN 'false' END",
    ),
    GridColumn::searchable(
        "has_glucid",
        "t.has_glucid",
        "CASE t.has_glucid WHEN 1 THEN 'true' WHEN 0 THEN 'false' END",
    ),
    GridColumn::searchable(
        "has_water_ion",
        "t.has_water_ion",
        "CASE t.has_water_ion WHEN 1 THEN 'true' WHEN 0 THEN 'false' END",
    ),
    GridColumn::searchable("file_name", "f.name", "f.name"),
    GridColumn::searchable("dataset_id_in_origin", "d.id_in_origin", "d.id_in_origin"),
    GridColumn::new("dataset_url", "d.url"),
    GridColumn::searchable("dataset_origin", "o.name", "o.name"),
];

pub const TOPOLOGY_TABLE: GridTable = GridTable {
    from_sql: "topology_file t
        JOIN file f ON t.file_id = f.file_id
        JOIN dataset d ON f.dataset_id = d.dataset_id
        JOIN dataset_origin o ON d.origin_id = o.origin_id",
    columns: &TOPOLOGY_COLUMNS,
    dataset_column: "f.dataset_id",
    tiebreak: "t.file_id",
};

const PARAMETER_COLUMNS: [GridColumn; 10] = [
    GridColumn::searchable("dt", "p.dt", "CAST(p.dt AS TEXT)"),
    GridColumn::searchable("nsteps", "p.nsteps", "CAST(p.nsteps AS TEXT)"),
    GridColumn::searchable("temperature", "p.temperature", "CAST(p.temperature AS TEXT)"),
    GridColumn::searchable("thermostat_name", "th.name", "th.name"),
    GridColumn::searchable("barostat_name", "ba.name", "ba.name"),
    GridColumn::searchable("integrator_name", "it.name", "it.name"),
    GridColumn::searchable("file_name", "f.name", "f.name"),
    GridColumn::searchable("dataset_id_in_origin", "d.id_in_origin", "d.id_in_origin"),
    GridColumn::new("dataset_url", "d.url"),
    GridColumn::searchable("dataset_origin", "o.name", "o.name"),
];

pub const PARAMETER_TABLE: GridTable = GridTable {
    from_sql: "parameter_file p
        JOIN file f ON p.file_id = f.file_id
        JOIN dataset d ON f.dataset_id = d.dataset_id
        JOIN dataset_origin o ON d.origin_id = o.origin_id
        LEFT JOIN thermostat th ON p.thermostat_id = th.thermostat_id
        LEFT JOIN barostat ba ON p.barostat_id = ba.barostat_id
        LEFT JOIN integrator it ON p.integrator_id = it.integrator_id",
    columns: &PARAMETER_COLUMNS,
    dataset_column: "f.dataset_id",
    tiebreak: "p.file_id",
};

const TRAJECTORY_COLUMNS: [GridColumn; 6] = [
    GridColumn::searchable("atom_number", "x.atom_number", "CAST(x.atom_number AS TEXT)"),
    GridColumn::searchable("frame_number", "x.frame_number", "CAST(x.frame_number AS TEXT)"),
    GridColumn::searchable("file_name", "f.name", "f.name"),
    GridColumn::searchable("dataset_id_in_origin", "d.id_in_origin", "d.id_in_origin"),
    GridColumn::new("dataset_url", "d.url"),
    GridColumn::searchable("dataset_origin", "o.name", "o.name"),
];

pub const TRAJECTORY_TABLE: GridTable = GridTable {
    from_sql: "trajectory_file x
        JOIN file f ON x.file_id = f.file_id
        JOIN dataset d ON f.dataset_id = d.dataset_id
        JOIN dataset_origin o ON d.origin_id = o.origin_id",
    columns: &TRAJECTORY_COLUMNS,
    dataset_column: "f.dataset_id",
    tiebreak: "x.file_id",
};

pub const TOPOLOGY_DEFAULT_SORT: &str = "atom_number";
pub const PARAMETER_DEFAULT_SORT: &str = "dt";
pub const TRAJECTORY_DEFAULT_SORT: &str = "atom_number";

fn decode_topology(row: &Row<'_>) -> rusqlite::Result<TopologyFileRow> {
    Ok(TopologyFileRow {
        atom_number: row.get(0)?,
        has_protein: row.get(1)?,
        has_nucleic: row.get(2)?,
        has_lipid: row.get(3)?,
        has_glucid: row.get(4)?,
        has_water_ion: row.get(5)?,
        file_name: row.get(6)?,
        dataset_id_in_origin: row.get(7)?,
        dataset_url: row.get(8)?,
        dataset_origin: row.get(9)?,
    })
}

fn decode_parameter(row: &Row<'_>) -> rusqlite::Result<ParameterFileRow> {
    Ok(ParameterFileRow {
        dt: row.get(0)?,
        nsteps: row.get(1)?,
        temperature: row.get(2)?,
        thermostat_name: row.get(3)?,
        barostat_name: row.get(4)?,
        integrator_name: row.get(5)?,
        file_name: row.get(6)?,
        dataset_id_in_origin: row.get(7)?,
        dataset_url: row.get(8)?,
        dataset_origin: row.get(9)?,
    })
}

fn decode_trajectory(row: &Row<'_>) -> rusqlite::Result<TrajectoryFileRow> {
    Ok(TrajectoryFileRow {
        atom_number: row.get(0)?,
        frame_number: row.get(1)?,
        file_name: row.get(2)?,
        dataset_id_in_origin: row.get(3)?,
        dataset_url: row.get(4)?,
        dataset_origin: row.get(5)?,
    })
}

pub fn topology_files(
    conn: &Connection,
    dataset: Option<DatasetId>,
    query: &GridQuery,
    limits: &QueryLimits,
) -> Result<Vec<TopologyFileRow>, QueryError> {
    TOPOLOGY_TABLE.fetch(conn, dataset, query, limits, decode_topology)
}

pub fn count_topology_files(
    conn: &Connection,
    dataset: Option<DatasetId>,
    search: Option<&str>,
) -> Result<u64, QueryError> {
    TOPOLOGY_TABLE.count(conn, dataset, search)
}

pub fn parameter_files(
    conn: &Connection,
    dataset: Option<DatasetId>,
    query: &GridQuery,
    limits: &QueryLimits,
) -> Result<Vec<ParameterFileRow>, QueryError> {
    PARAMETER_TABLE.fetch(conn, dataset, query, limits, decode_parameter)
}

pub fn count_parameter_files(
    conn: &Connection,
    dataset: Option<DatasetId>,
    search: Option<&str>,
) -> Result<u64, QueryError> {
    PARAMETER_TABLE.count(conn, dataset, search)
}

/// Every parameter file in the catalog, bypassing the page-length limit.
pub fn all_parameter_files(conn: &Connection) -> Result<Vec<ParameterFileRow>, QueryError> {
    let unbounded = QueryLimits {
        max_page_length: u64::MAX,
        ..QueryLimits::default()
    };
    PARAMETER_TABLE.fetch(
        conn,
        None,
        &GridQuery::default(),
        &unbounded,
        decode_parameter,
    )
}

pub fn trajectory_files(
    conn: &Connection,
    dataset: Option<DatasetId>,
    query: &GridQuery,
    limits: &QueryLimits,
) -> Result<Vec<TrajectoryFileRow>, QueryError> {
    TRAJECTORY_TABLE.fetch(conn, dataset, query, limits, decode_trajectory)
}

pub fn count_trajectory_files(
    conn: &Connection,
    dataset: Option<DatasetId>,
    search: Option<&str>,
) -> Result<u64, QueryError> {
    TRAJECTORY_TABLE.count(conn, dataset, search)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_columns_search_as_words() {
        let query = GridQuery {
            search: Some("true".to_string()),
            ..GridQuery::default()
        };
        let (sql, _) = TOPOLOGY_TABLE.build_select(None, &query).expect("compile");
        assert!(sql.contains("CASE t.has_protein WHEN 1 THEN 'true'"));
        assert!(!sql.contains("d.url LIKE"));
    }

    #[test]
    fn parameter_names_come_from_outer_joins() {
        let (sql, _) = PARAMETER_TABLE
            .build_select(None, &GridQuery::sorted_by("thermostat_name", crate::SortDirection::Desc))
            .expect("compile");
        assert!(sql.contains("LEFT JOIN thermostat th"));
        assert!(sql.contains("ORDER BY thermostat_name DESC, p.file_id ASC"));
    }
}
