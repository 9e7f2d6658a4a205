// SPDX-License-Identifier: Apache-2.0

//! Parameters of the data-grid widget's server-side protocol.

use crate::errors::ApiError;
use mdverse_query::{GridQuery, GridSort, QueryLimits, SortDirection};
use std::collections::BTreeMap;

pub const PARAM_DRAW: &str = "draw";
pub const PARAM_ORDER_COLUMN: &str = "order[0][column]";
pub const PARAM_ORDER_DIR: &str = "order[0][dir]";
pub const PARAM_START: &str = "start";
pub const PARAM_LENGTH: &str = "length";
pub const PARAM_SEARCH: &str = "search[value]";

/// A decoded grid request: the echo counter plus the query to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridParams {
    pub draw: Option<u64>,
    pub query: GridQuery,
}

pub fn parse_grid_params(
    query: &BTreeMap<String, String>,
    default_sort: &str,
    limits: &QueryLimits,
) -> Result<GridParams, ApiError> {
    let draw = parse_optional_u64(query, PARAM_DRAW)?;

    let order_column = query
        .get(PARAM_ORDER_COLUMN)
        .filter(|raw| !raw.trim().is_empty());
    let column = match order_column {
        None => default_sort.to_string(),
        Some(raw) => {
            let index = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ApiError::invalid_param(PARAM_ORDER_COLUMN, raw))?;
            let key = format!("columns[{index}][data]");
            query
                .get(&key)
                .filter(|name| !name.trim().is_empty())
                .cloned()
                .ok_or_else(|| ApiError::invalid_param(&key, ""))?
        }
    };
    let direction = match query.get(PARAM_ORDER_DIR).map(String::as_str) {
        Some(dir) if dir.eq_ignore_ascii_case("desc") => SortDirection::Desc,
        _ => SortDirection::Asc,
    };

    let start = parse_optional_u64(query, PARAM_START)?;

    let length = match query.get(PARAM_LENGTH) {
        None => None,
        Some(raw) if raw.trim() == "-1" => None,
        Some(raw) => {
            let value = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ApiError::invalid_param(PARAM_LENGTH, raw))?;
            if value > limits.max_page_length {
                return Err(ApiError::invalid_param(PARAM_LENGTH, raw));
            }
            Some(value)
        }
    };

    let search = query.get(PARAM_SEARCH).cloned();
    if let Some(term) = &search {
        if term.chars().count() > limits.max_search_len {
            return Err(ApiError::invalid_param(PARAM_SEARCH, term));
        }
    }

    Ok(GridParams {
        draw,
        query: GridQuery {
            sort: Some(GridSort { column, direction }),
            start,
            length,
            search,
        },
    })
}

fn parse_optional_u64(query: &BTreeMap<String, String>, name: &str) -> Result<Option<u64>, ApiError> {
    query
        .get(name)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map_err(|_| ApiError::invalid_param(name, raw))
        })
        .transpose()
}
