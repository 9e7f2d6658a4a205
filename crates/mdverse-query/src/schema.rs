// SPDX-License-Identifier: Apache-2.0

use crate::query_error::{sql_error, QueryError, QueryErrorCode};
use rusqlite::Connection;
use std::collections::BTreeSet;

pub const REQUIRED_TABLES: [&str; 14] = [
    "author",
    "barostat",
    "dataset",
    "dataset_author_link",
    "dataset_keyword_link",
    "dataset_origin",
    "file",
    "file_type",
    "integrator",
    "keyword",
    "parameter_file",
    "thermostat",
    "topology_file",
    "trajectory_file",
];

/// DDL of the catalog tables this crate reads. The production database is
/// created elsewhere; this is the column contract the queries depend on.
pub const REFERENCE_SCHEMA_SQL: &str = "
CREATE TABLE dataset_origin (
  origin_id INTEGER PRIMARY KEY,
  name TEXT NOT NULL UNIQUE
);
CREATE TABLE dataset (
  dataset_id INTEGER PRIMARY KEY,
  origin_id INTEGER NOT NULL REFERENCES dataset_origin(origin_id),
  id_in_origin TEXT NOT NULL,
  url TEXT,
  title TEXT NOT NULL,
  description TEXT,
  date_created TEXT,
  date_last_modified TEXT,
  file_number INTEGER,
  download_number INTEGER,
  view_number INTEGER
);
CREATE TABLE author (
  author_id INTEGER PRIMARY KEY,
  name TEXT NOT NULL
);
CREATE TABLE dataset_author_link (
  dataset_id INTEGER NOT NULL REFERENCES dataset(dataset_id),
  author_id INTEGER NOT NULL REFERENCES author(author_id),
  PRIMARY KEY (dataset_id, author_id)
);
CREATE TABLE keyword (
  keyword_id INTEGER PRIMARY KEY,
  entry TEXT NOT NULL
);
CREATE TABLE dataset_keyword_link (
  dataset_id INTEGER NOT NULL REFERENCES dataset(dataset_id),
  keyword_id INTEGER NOT NULL REFERENCES keyword(keyword_id),
  PRIMARY KEY (dataset_id, keyword_id)
);
CREATE TABLE file_type (
  file_type_id INTEGER PRIMARY KEY,
  name TEXT NOT NULL UNIQUE
);
CREATE TABLE file (
  file_id INTEGER PRIMARY KEY,
  dataset_id INTEGER NOT NULL REFERENCES dataset(dataset_id),
  file_type_id INTEGER REFERENCES file_type(file_type_id),
  name TEXT NOT NULL,
  size_in_bytes INTEGER,
  url TEXT,
  is_from_zip_file INTEGER NOT NULL DEFAULT 0,
  parent_zip_file_id INTEGER REFERENCES file(file_id)
);
CREATE TABLE thermostat (
  thermostat_id INTEGER PRIMARY KEY,
  name TEXT NOT NULL
);
CREATE TABLE barostat (
  barostat_id INTEGER PRIMARY KEY,
  name TEXT NOT NULL
);
CREATE TABLE integrator (
  integrator_id INTEGER PRIMARY KEY,
  name TEXT NOT NULL
);
CREATE TABLE topology_file (
  file_id INTEGER PRIMARY KEY REFERENCES file(file_id),
  atom_number INTEGER,
  has_protein INTEGER,
  has_nucleic INTEGER,
  has_lipid INTEGER,
  has_glucid INTEGER,
  has_water_ion INTEGER
);
CREATE TABLE parameter_file (
  file_id INTEGER PRIMARY KEY REFERENCES file(file_id),
  dt REAL,
  nsteps INTEGER,
  temperature REAL,
  thermostat_id INTEGER REFERENCES thermostat(thermostat_id),
  barostat_id INTEGER REFERENCES barostat(barostat_id),
  integrator_id INTEGER REFERENCES integrator(integrator_id)
);
CREATE TABLE trajectory_file (
  file_id INTEGER PRIMARY KEY REFERENCES file(file_id),
  atom_number INTEGER,
  frame_number INTEGER
);
CREATE INDEX idx_dataset_origin_id ON dataset(origin_id);
CREATE INDEX idx_file_dataset_id ON file(dataset_id);
CREATE INDEX idx_file_file_type_id ON file(file_type_id);
";

/// Fails with `QueryErrorCode::Schema` listing every required table that is absent.
pub fn verify_schema(conn: &Connection) -> Result<(), QueryError> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type IN ('table', 'view')")
        .map_err(sql_error)?;
    let present = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(sql_error)?
        .collect::<Result<BTreeSet<_>, _>>()
        .map_err(sql_error)?;
    let missing = REQUIRED_TABLES
        .iter()
        .filter(|t| !present.contains(**t))
        .copied()
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(QueryError::new(
            QueryErrorCode::Schema,
            format!("catalog database is missing tables: {}", missing.join(", ")),
        ));
    }
    Ok(())
}
