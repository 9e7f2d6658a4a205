// SPDX-License-Identifier: Apache-2.0

use crate::query_error::{sql_error, QueryError};
use crate::summary::count;
use mdverse_model::{FileListingRow, FileTypeStatsRow, BYTES_PER_GIGABYTE};
use rusqlite::{params, Connection, OptionalExtension};

const FILE_TYPE_STATS_SQL: &str = "
SELECT ft.name,
       COUNT(f.file_id),
       COUNT(DISTINCT d.dataset_id),
       COALESCE(SUM(f.size_in_bytes), 0)
FROM file_type ft
JOIN file f ON f.file_type_id = ft.file_type_id
LEFT JOIN dataset d ON d.dataset_id = f.dataset_id
GROUP BY ft.name
ORDER BY COUNT(DISTINCT f.file_id) DESC, ft.name ASC";

// Files extracted from an archive are downloadable only through the archive URL.
const FILES_FOR_TYPE_SQL: &str = "
SELECT d.id_in_origin,
       o.name,
       f.name,
       f.size_in_bytes,
       f.is_from_zip_file,
       CASE WHEN f.is_from_zip_file = 1 THEN parent.url ELSE f.url END,
       d.url
FROM file f
JOIN file_type ft ON f.file_type_id = ft.file_type_id
JOIN dataset d ON f.dataset_id = d.dataset_id
JOIN dataset_origin o ON d.origin_id = o.origin_id
LEFT JOIN file parent ON f.parent_zip_file_id = parent.file_id
WHERE ft.name = ?1
ORDER BY o.name, d.id_in_origin, f.name, f.file_id";

pub fn file_type_stats(conn: &Connection) -> Result<Vec<FileTypeStatsRow>, QueryError> {
    let mut stmt = conn.prepare_cached(FILE_TYPE_STATS_SQL).map_err(sql_error)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(FileTypeStatsRow {
                file_type: row.get(0)?,
                number_of_files: count(row.get(1)?),
                number_of_datasets: count(row.get(2)?),
                total_size_in_gb: row.get::<_, f64>(3)? / BYTES_PER_GIGABYTE,
            })
        })
        .map_err(sql_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(sql_error)?;
    Ok(rows)
}

pub fn file_type_exists(conn: &Connection, file_type: &str) -> Result<bool, QueryError> {
    let found = conn
        .query_row(
            "SELECT 1 FROM file_type WHERE name = ?1 LIMIT 1",
            params![file_type],
            |row| row.get::<_, i64>(0),
        )
        .optional()
        .map_err(sql_error)?;
    Ok(found.is_some())
}

pub fn files_for_file_type(
    conn: &Connection,
    file_type: &str,
) -> Result<Vec<FileListingRow>, QueryError> {
    let mut stmt = conn.prepare_cached(FILES_FOR_TYPE_SQL).map_err(sql_error)?;
    let rows = stmt
        .query_map(params![file_type], |row| {
            Ok(FileListingRow {
                dataset_id: row.get(0)?,
                dataset_origin: row.get(1)?,
                file_name: row.get(2)?,
                file_size_in_bytes: row.get(3)?,
                is_file_from_zip_file: row.get(4)?,
                file_url: row.get(5)?,
                dataset_url: row.get(6)?,
            })
        })
        .map_err(sql_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(sql_error)?;
    Ok(rows)
}
