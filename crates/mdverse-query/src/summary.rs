// SPDX-License-Identifier: Apache-2.0

use crate::query_error::{sql_error, QueryError};
use mdverse_model::{OriginSummaryRow, OriginSummaryTotals, YearlyCounts, BYTES_PER_GIGABYTE};
use rusqlite::{params, Connection};

// Outer joins keep origins whose datasets have no file at all.
const ORIGIN_SUMMARY_SQL: &str = "
SELECT o.name,
       COUNT(DISTINCT d.dataset_id),
       MIN(d.date_created),
       MAX(d.date_created),
       COUNT(DISTINCT f.file_id) FILTER (WHERE f.is_from_zip_file = 0 AND ft.name <> 'zip'),
       COALESCE(SUM(f.size_in_bytes) FILTER (WHERE f.is_from_zip_file = 0), 0),
       COUNT(DISTINCT f.file_id) FILTER (WHERE f.is_from_zip_file = 0 AND ft.name = 'zip'),
       COUNT(DISTINCT f.file_id) FILTER (WHERE f.is_from_zip_file = 1),
       COUNT(DISTINCT f.file_id)
FROM dataset_origin o
JOIN dataset d ON d.origin_id = o.origin_id
LEFT JOIN file f ON f.dataset_id = d.dataset_id
LEFT JOIN file_type ft ON f.file_type_id = ft.file_type_id
GROUP BY o.name
ORDER BY o.name";

const ANALYSED_FILES_SQL: &str = "
SELECT (SELECT COUNT(*) FROM topology_file)
     + (SELECT COUNT(*) FROM parameter_file)
     + (SELECT COUNT(*) FROM trajectory_file)";

const YEARLY_FILES_SQL: &str = "
SELECT CAST(strftime('%Y', d.date_created) AS INTEGER) AS year, COUNT(d.dataset_id)
FROM dataset d
JOIN file f ON f.dataset_id = d.dataset_id
JOIN dataset_origin o ON d.origin_id = o.origin_id
WHERE o.name = ?1
GROUP BY year
ORDER BY year";

const YEARLY_DATASETS_SQL: &str = "
SELECT CAST(strftime('%Y', d.date_created) AS INTEGER) AS year, COUNT(d.dataset_id)
FROM dataset d
JOIN dataset_origin o ON d.origin_id = o.origin_id
WHERE o.name = ?1
GROUP BY year
ORDER BY year";

pub fn dataset_origin_summary(
    conn: &Connection,
) -> Result<(Vec<OriginSummaryRow>, OriginSummaryTotals), QueryError> {
    let mut stmt = conn.prepare_cached(ORIGIN_SUMMARY_SQL).map_err(sql_error)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(OriginSummaryRow {
                dataset_origin: row.get(0)?,
                number_of_datasets: count(row.get(1)?),
                first_dataset: row.get(2)?,
                last_dataset: row.get(3)?,
                non_zip_files: count(row.get(4)?),
                total_size_in_gb: row.get::<_, f64>(5)? / BYTES_PER_GIGABYTE,
                zip_files: count(row.get(6)?),
                files_within_zip_files: count(row.get(7)?),
                total_files: count(row.get(8)?),
            })
        })
        .map_err(sql_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(sql_error)?;
    let analysed = conn
        .query_row(ANALYSED_FILES_SQL, [], |row| row.get::<_, i64>(0))
        .map_err(sql_error)?;
    let totals = OriginSummaryTotals::from_rows(&rows, count(analysed));
    Ok((rows, totals))
}

pub fn dataset_titles(conn: &Connection) -> Result<Vec<String>, QueryError> {
    let mut stmt = conn
        .prepare_cached("SELECT title FROM dataset WHERE title IS NOT NULL ORDER BY dataset_id")
        .map_err(sql_error)?;
    let titles = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(sql_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(sql_error)?;
    Ok(titles)
}

/// Counts (dataset, file) pairs per year of dataset creation.
pub fn yearly_file_counts_for_origin(
    conn: &Connection,
    origin: &str,
) -> Result<YearlyCounts, QueryError> {
    yearly_counts(conn, YEARLY_FILES_SQL, origin)
}

pub fn yearly_dataset_counts_for_origin(
    conn: &Connection,
    origin: &str,
) -> Result<YearlyCounts, QueryError> {
    yearly_counts(conn, YEARLY_DATASETS_SQL, origin)
}

fn yearly_counts(conn: &Connection, sql: &str, origin: &str) -> Result<YearlyCounts, QueryError> {
    let mut stmt = conn.prepare_cached(sql).map_err(sql_error)?;
    let pairs = stmt
        .query_map(params![origin], |row| {
            Ok((row.get::<_, Option<i64>>(0)?, row.get::<_, i64>(1)?))
        })
        .map_err(sql_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(sql_error)?;
    Ok(pairs
        .into_iter()
        .filter_map(|(year, n)| {
            let year = i32::try_from(year?).ok()?;
            Some((year, count(n)))
        })
        .collect())
}

pub(crate) fn count(v: i64) -> u64 {
    v.max(0) as u64
}
