// SPDX-License-Identifier: Apache-2.0

use crate::{ApiError, ApiErrorCode};
use mdverse_query::{QueryError, QueryErrorCode};
use serde_json::json;

#[must_use]
pub fn status_code(error: &ApiError) -> u16 {
    match error.code {
        ApiErrorCode::InvalidQueryParameter => 400,
        ApiErrorCode::DatasetNotFound | ApiErrorCode::FileTypeNotFound => 404,
        ApiErrorCode::NotReady => 503,
        _ => 500,
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        match err.code {
            QueryErrorCode::Validation => Self::new(
                ApiErrorCode::InvalidQueryParameter,
                err.message,
                json!({}),
                "req-unknown",
            ),
            QueryErrorCode::Schema => Self::not_ready(err.message),
            _ => Self::internal(err.message),
        }
    }
}
