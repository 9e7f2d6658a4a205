// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod error_mapping;
mod errors;
mod params;
mod responses;

pub const CRATE_NAME: &str = "mdverse-api";

pub use error_mapping::status_code;
pub use errors::{ApiError, ApiErrorCode};
pub use params::{
    parse_grid_params, GridParams, PARAM_DRAW, PARAM_LENGTH, PARAM_ORDER_COLUMN, PARAM_ORDER_DIR,
    PARAM_SEARCH, PARAM_START,
};
pub use responses::GridResponse;
