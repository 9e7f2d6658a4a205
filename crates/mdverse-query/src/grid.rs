// SPDX-License-Identifier: Apache-2.0

//! Compilation of grid requests (sort, search, pagination) into SQL over a
//! fixed table description. Column names that reach `ORDER BY` always come
//! from the table's whitelist, never from the request.

use crate::filters::{escape_like, fold_search_text, SEARCH_FOLD_FUNCTION};
use crate::limits::QueryLimits;
use crate::query_error::{sql_error, QueryError};
use mdverse_model::DatasetId;
use rusqlite::{params_from_iter, types::Value, Connection, Row};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSort {
    pub column: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GridQuery {
    pub sort: Option<GridSort>,
    pub start: Option<u64>,
    /// `None` returns every row from `start` on.
    pub length: Option<u64>,
    pub search: Option<String>,
}

impl GridQuery {
    #[must_use]
    pub fn sorted_by(column: &str, direction: SortDirection) -> Self {
        Self {
            sort: Some(GridSort {
                column: column.to_string(),
                direction,
            }),
            ..Self::default()
        }
    }

    /// Search term with surrounding whitespace removed; blank means no filter.
    #[must_use]
    pub fn effective_search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn validate(&self, limits: &QueryLimits) -> Result<(), QueryError> {
        if let Some(length) = self.length {
            if length > limits.max_page_length {
                return Err(QueryError::validation(format!(
                    "page length must be at most {}",
                    limits.max_page_length
                )));
            }
        }
        if let Some(search) = &self.search {
            if search.chars().count() > limits.max_search_len {
                return Err(QueryError::validation(format!(
                    "search term exceeds {} characters",
                    limits.max_search_len
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridColumn {
    pub name: &'static str,
    pub expr: &'static str,
    /// Text form used for substring search; `None` excludes the column.
    pub search_expr: Option<&'static str>,
}

impl GridColumn {
    #[must_use]
    pub const fn new(name: &'static str, expr: &'static str) -> Self {
        Self {
            name,
            expr,
            search_expr: None,
        }
    }

    #[must_use]
    pub const fn searchable(name: &'static str, expr: &'static str, search: &'static str) -> Self {
        Self {
            name,
            expr,
            search_expr: Some(search),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GridTable {
    pub from_sql: &'static str,
    pub columns: &'static [GridColumn],
    pub dataset_column: &'static str,
    pub tiebreak: &'static str,
}

impl GridTable {
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    fn where_clause(
        &self,
        dataset: Option<DatasetId>,
        search: Option<&str>,
        params: &mut Vec<Value>,
    ) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(id) = dataset {
            parts.push(format!("{} = ?", self.dataset_column));
            params.push(Value::Integer(id.get()));
        }
        if let Some(term) = search {
            let pattern = format!("%{}%", escape_like(&fold_search_text(term)));
            let ors = self
                .columns
                .iter()
                .filter_map(|c| c.search_expr)
                .map(|expr| {
                    params.push(Value::Text(pattern.clone()));
                    format!("{SEARCH_FOLD_FUNCTION}({expr}) LIKE ? ESCAPE '!'")
                })
                .collect::<Vec<_>>();
            if !ors.is_empty() {
                parts.push(format!("({})", ors.join(" OR ")));
            }
        }
        if parts.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", parts.join(" AND "))
        }
    }

    pub fn build_select(
        &self,
        dataset: Option<DatasetId>,
        query: &GridQuery,
    ) -> Result<(String, Vec<Value>), QueryError> {
        let projection = self
            .columns
            .iter()
            .map(|c| format!("{} AS {}", c.expr, c.name))
            .collect::<Vec<_>>()
            .join(", ");
        let mut params = Vec::new();
        let mut sql = format!("SELECT {projection} FROM {}", self.from_sql);
        sql.push_str(&self.where_clause(dataset, query.effective_search(), &mut params));

        sql.push_str(" ORDER BY ");
        if let Some(sort) = &query.sort {
            let column = self
                .columns
                .iter()
                .find(|c| c.name == sort.column)
                .ok_or_else(|| {
                    QueryError::validation(format!("unknown sort column: {}", sort.column))
                })?;
            sql.push_str(&format!("{} {}, ", column.name, sort.direction.as_sql()));
        }
        sql.push_str(self.tiebreak);
        sql.push_str(" ASC");

        match (query.length, query.start) {
            (Some(length), start) => {
                sql.push_str(" LIMIT ? OFFSET ?");
                params.push(Value::Integer(to_sql_int(length)));
                params.push(Value::Integer(to_sql_int(start.unwrap_or(0))));
            }
            (None, Some(start)) if start > 0 => {
                sql.push_str(" LIMIT -1 OFFSET ?");
                params.push(Value::Integer(to_sql_int(start)));
            }
            (None, _) => {}
        }
        Ok((sql, params))
    }

    #[must_use]
    pub fn build_count(&self, dataset: Option<DatasetId>, search: Option<&str>) -> (String, Vec<Value>) {
        let mut params = Vec::new();
        let mut sql = format!("SELECT COUNT(*) FROM {}", self.from_sql);
        sql.push_str(&self.where_clause(dataset, search, &mut params));
        (sql, params)
    }

    pub fn fetch<T>(
        &self,
        conn: &Connection,
        dataset: Option<DatasetId>,
        query: &GridQuery,
        limits: &QueryLimits,
        decode: impl Fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>, QueryError> {
        query.validate(limits)?;
        let (sql, params) = self.build_select(dataset, query)?;
        let mut stmt = conn.prepare_cached(&sql).map_err(sql_error)?;
        let rows = stmt
            .query_map(params_from_iter(params.iter()), |row| decode(row))
            .map_err(sql_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(sql_error)?;
        Ok(rows)
    }

    pub fn count(
        &self,
        conn: &Connection,
        dataset: Option<DatasetId>,
        search: Option<&str>,
    ) -> Result<u64, QueryError> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        let (sql, params) = self.build_count(dataset, search);
        let mut stmt = conn.prepare_cached(&sql).map_err(sql_error)?;
        let n = stmt
            .query_row(params_from_iter(params.iter()), |row| row.get::<_, i64>(0))
            .map_err(sql_error)?;
        Ok(n.max(0) as u64)
    }
}

fn to_sql_int(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: [GridColumn; 3] = [
        GridColumn::searchable("origin", "o.name", "o.name"),
        GridColumn::searchable("title", "d.title", "d.title"),
        GridColumn::new("views", "d.view_number"),
    ];

    const TABLE: GridTable = GridTable {
        from_sql: "dataset d JOIN dataset_origin o ON d.origin_id = o.origin_id",
        columns: &COLUMNS,
        dataset_column: "d.dataset_id",
        tiebreak: "d.dataset_id",
    };

    #[test]
    fn select_binds_search_sort_and_page() {
        let query = GridQuery {
            sort: Some(GridSort {
                column: "title".to_string(),
                direction: SortDirection::Desc,
            }),
            start: Some(20),
            length: Some(10),
            search: Some("50%_DONE".to_string()),
        };
        let (sql, params) = TABLE.build_select(None, &query).expect("compile");
        assert!(sql.contains(
            "WHERE (mdverse_fold(o.name) LIKE ? ESCAPE '!' OR mdverse_fold(d.title) LIKE ? ESCAPE '!')"
        ));
        assert!(sql.contains("ORDER BY title DESC, d.dataset_id ASC LIMIT ? OFFSET ?"));
        assert_eq!(params.len(), 4);
        assert_eq!(params[0], Value::Text("%50!%!_done%".to_string()));
        assert_eq!(params[2], Value::Integer(10));
        assert_eq!(params[3], Value::Integer(20));
    }

    #[test]
    fn unknown_sort_column_is_rejected_not_spliced() {
        let query = GridQuery::sorted_by("title; DROP TABLE dataset", SortDirection::Asc);
        let err = TABLE.build_select(None, &query).expect_err("rejected");
        assert_eq!(err.code, crate::QueryErrorCode::Validation);
    }

    #[test]
    fn blank_search_and_missing_length_leave_query_unbounded() {
        let query = GridQuery {
            search: Some("   ".to_string()),
            ..GridQuery::default()
        };
        let (sql, params) = TABLE.build_select(None, &query).expect("compile");
        assert!(!sql.contains("WHERE"));
        assert!(!sql.contains("LIMIT"));
        assert!(params.is_empty());
    }

    #[test]
    fn offset_without_length_uses_unbounded_limit() {
        let query = GridQuery {
            start: Some(5),
            ..GridQuery::default()
        };
        let (sql, params) = TABLE.build_select(None, &query).expect("compile");
        assert!(sql.ends_with("LIMIT -1 OFFSET ?"));
        assert_eq!(params, vec![Value::Integer(5)]);
    }

    #[test]
    fn dataset_scope_precedes_search() {
        let dataset = DatasetId::new(7).expect("id");
        let (sql, params) = TABLE.build_count(Some(dataset), Some("md"));
        assert!(sql.contains("WHERE d.dataset_id = ? AND ("));
        assert_eq!(params[0], Value::Integer(7));
    }

    #[test]
    fn limits_bound_page_length_and_search() {
        let limits = QueryLimits {
            max_page_length: 10,
            max_search_len: 3,
        };
        let long_page = GridQuery {
            length: Some(11),
            ..GridQuery::default()
        };
        assert!(long_page.validate(&limits).is_err());
        let long_search = GridQuery {
            search: Some("abcd".to_string()),
            ..GridQuery::default()
        };
        assert!(long_search.validate(&limits).is_err());
        assert!(GridQuery::default().validate(&limits).is_ok());
    }
}
