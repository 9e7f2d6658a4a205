// SPDX-License-Identifier: Apache-2.0

use crate::grid::{GridColumn, GridQuery, GridTable};
use crate::limits::QueryLimits;
use crate::query_error::{sql_error, QueryError};
use crate::summary::count;
use mdverse_model::{
    DatasetAnalysedCounts, DatasetDetail, DatasetFileCounts, DatasetFileRow, DatasetGridRow,
    DatasetId,
};
use rusqlite::{params, Connection, OptionalExtension, Row};

const DATASET_COLUMNS: [GridColumn; 11] = [
    GridColumn::searchable("dataset_origin", "o.name", "o.name"),
    GridColumn::searchable("dataset_id_in_origin", "d.id_in_origin", "d.id_in_origin"),
    GridColumn::new("dataset_id", "d.dataset_id"),
    GridColumn::searchable("title", "d.title", "d.title"),
    GridColumn::searchable("description", "d.description", "d.description"),
    GridColumn::new("date_created", "d.date_created"),
    GridColumn::new("date_last_modified", "d.date_last_modified"),
    GridColumn::new("file_number", "d.file_number"),
    GridColumn::new("download_number", "d.download_number"),
    GridColumn::new("view_number", "d.view_number"),
    GridColumn::new("url", "d.url"),
];

pub const DATASETS_TABLE: GridTable = GridTable {
    from_sql: "dataset d JOIN dataset_origin o ON d.origin_id = o.origin_id",
    columns: &DATASET_COLUMNS,
    dataset_column: "d.dataset_id",
    tiebreak: "d.dataset_id",
};

pub const DATASETS_DEFAULT_SORT: &str = "dataset_origin";

fn decode_dataset_row(row: &Row<'_>) -> rusqlite::Result<DatasetGridRow> {
    Ok(DatasetGridRow {
        dataset_origin: row.get(0)?,
        dataset_id_in_origin: row.get(1)?,
        dataset_id: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        date_created: row.get(5)?,
        date_last_modified: row.get(6)?,
        file_number: row.get(7)?,
        download_number: row.get(8)?,
        view_number: row.get(9)?,
        url: row.get(10)?,
    })
}

pub fn datasets_grid(
    conn: &Connection,
    query: &GridQuery,
    limits: &QueryLimits,
) -> Result<Vec<DatasetGridRow>, QueryError> {
    DATASETS_TABLE.fetch(conn, None, query, limits, decode_dataset_row)
}

pub fn count_datasets(conn: &Connection, search: Option<&str>) -> Result<u64, QueryError> {
    DATASETS_TABLE.count(conn, None, search)
}

const DATASET_DETAIL_SQL: &str = "
SELECT d.dataset_id, o.name, d.id_in_origin, d.title, d.description, d.date_created,
       d.date_last_modified, d.file_number, d.download_number, d.view_number, d.url
FROM dataset d
JOIN dataset_origin o ON d.origin_id = o.origin_id
WHERE d.dataset_id = ?1";

pub fn dataset_by_id(conn: &Connection, id: DatasetId) -> Result<Option<DatasetDetail>, QueryError> {
    let detail = conn
        .query_row(DATASET_DETAIL_SQL, params![id.get()], |row| {
            Ok(DatasetDetail {
                dataset_id: row.get(0)?,
                dataset_origin: row.get(1)?,
                id_in_origin: row.get(2)?,
                title: row.get(3)?,
                description: row.get(4)?,
                date_created: row.get(5)?,
                date_last_modified: row.get(6)?,
                file_number: row.get(7)?,
                download_number: row.get(8)?,
                view_number: row.get(9)?,
                url: row.get(10)?,
                authors: Vec::new(),
                keywords: Vec::new(),
            })
        })
        .optional()
        .map_err(sql_error)?;
    let Some(mut detail) = detail else {
        return Ok(None);
    };
    detail.authors = names_for(
        conn,
        "SELECT a.name FROM author a JOIN dataset_author_link l ON l.author_id = a.author_id WHERE l.dataset_id = ?1 ORDER BY a.name",
        id,
    )?;
    detail.keywords = names_for(
        conn,
        "SELECT k.entry FROM keyword k JOIN dataset_keyword_link l ON l.keyword_id = k.keyword_id WHERE l.dataset_id = ?1 ORDER BY k.entry",
        id,
    )?;
    Ok(Some(detail))
}

fn names_for(conn: &Connection, sql: &str, id: DatasetId) -> Result<Vec<String>, QueryError> {
    let mut stmt = conn.prepare_cached(sql).map_err(sql_error)?;
    let names = stmt
        .query_map(params![id.get()], |row| row.get::<_, String>(0))
        .map_err(sql_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(sql_error)?;
    Ok(names)
}

pub fn dataset_file_counts(
    conn: &Connection,
    id: DatasetId,
) -> Result<DatasetFileCounts, QueryError> {
    conn.query_row(
        "SELECT COUNT(f.file_id),
                COUNT(f.file_id) FILTER (WHERE ft.name = 'gro'),
                COUNT(f.file_id) FILTER (WHERE ft.name = 'mdp'),
                COUNT(f.file_id) FILTER (WHERE ft.name = 'xtc')
         FROM file f
         JOIN file_type ft ON f.file_type_id = ft.file_type_id
         WHERE f.dataset_id = ?1",
        params![id.get()],
        |row| {
            Ok(DatasetFileCounts {
                total_all_files: count(row.get(0)?),
                total_topology_files: count(row.get(1)?),
                total_parameter_files: count(row.get(2)?),
                total_trajectory_files: count(row.get(3)?),
            })
        },
    )
    .map_err(sql_error)
}

/// Files of the dataset that have a row in their type's detail table.
pub fn dataset_analysed_counts(
    conn: &Connection,
    id: DatasetId,
) -> Result<DatasetAnalysedCounts, QueryError> {
    conn.query_row(
        "SELECT
           (SELECT COUNT(*) FROM topology_file t JOIN file f ON f.file_id = t.file_id WHERE f.dataset_id = ?1),
           (SELECT COUNT(*) FROM parameter_file p JOIN file f ON f.file_id = p.file_id WHERE f.dataset_id = ?1),
           (SELECT COUNT(*) FROM trajectory_file x JOIN file f ON f.file_id = x.file_id WHERE f.dataset_id = ?1)",
        params![id.get()],
        |row| {
            Ok(DatasetAnalysedCounts {
                analysed_topology_files: count(row.get(0)?),
                analysed_parameter_files: count(row.get(1)?),
                analysed_trajectory_files: count(row.get(2)?),
            })
        },
    )
    .map_err(sql_error)
}

pub fn files_in_dataset(conn: &Connection, id: DatasetId) -> Result<Vec<DatasetFileRow>, QueryError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT f.file_id, f.name, COALESCE(ft.name, ''), f.size_in_bytes, f.is_from_zip_file,
                    f.url, d.id_in_origin, o.name
             FROM file f
             LEFT JOIN file_type ft ON f.file_type_id = ft.file_type_id
             JOIN dataset d ON f.dataset_id = d.dataset_id
             JOIN dataset_origin o ON d.origin_id = o.origin_id
             WHERE f.dataset_id = ?1
             ORDER BY f.name, f.file_id",
        )
        .map_err(sql_error)?;
    let rows = stmt
        .query_map(params![id.get()], |row| {
            Ok(DatasetFileRow {
                file_id: row.get(0)?,
                file_name: row.get(1)?,
                file_type: row.get(2)?,
                size_in_bytes: row.get(3)?,
                is_from_zip_file: row.get(4)?,
                url: row.get(5)?,
                dataset_id_in_origin: row.get(6)?,
                dataset_origin: row.get(7)?,
            })
        })
        .map_err(sql_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(sql_error)?;
    Ok(rows)
}
