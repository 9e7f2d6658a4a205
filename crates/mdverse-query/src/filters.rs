// SPDX-License-Identifier: Apache-2.0

use crate::query_error::{sql_error, QueryError};
use rusqlite::functions::FunctionFlags;
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use unicode_normalization::UnicodeNormalization;

/// SQL name of the scalar function that folds a column for search matching.
pub const SEARCH_FOLD_FUNCTION: &str = "mdverse_fold";

/// Escapes LIKE wildcards with `!`; pair with `ESCAPE '!'`.
#[must_use]
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        match c {
            '!' | '%' | '_' => {
                out.push('!');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// NFKC then full Unicode lowercase. Search terms and column values both go
/// through this, so `ÉTUDE` matches `étude`.
#[must_use]
pub fn fold_search_text(input: &str) -> String {
    input.nfkc().collect::<String>().to_lowercase()
}

/// Registers [`SEARCH_FOLD_FUNCTION`] on `conn`. Grid searches call it, so
/// every connection that runs them needs it.
pub fn register_search_functions(conn: &Connection) -> Result<(), QueryError> {
    conn.create_scalar_function(
        SEARCH_FOLD_FUNCTION,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let folded = match ctx.get_raw(0) {
                ValueRef::Null | ValueRef::Blob(_) => None,
                ValueRef::Text(bytes) => Some(fold_search_text(&String::from_utf8_lossy(bytes))),
                ValueRef::Integer(v) => Some(v.to_string()),
                ValueRef::Real(v) => Some(v.to_string()),
            };
            Ok(folded)
        },
    )
    .map_err(sql_error)
}
