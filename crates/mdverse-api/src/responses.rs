// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Grid protocol reply; `draw` echoes the request counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridResponse<T> {
    pub draw: Option<u64>,
    pub records_total: u64,
    pub records_filtered: u64,
    pub data: Vec<T>,
}

impl<T> GridResponse<T> {
    #[must_use]
    pub fn new(draw: Option<u64>, records_total: u64, records_filtered: u64, data: Vec<T>) -> Self {
        Self {
            draw,
            records_total,
            records_filtered,
            data,
        }
    }
}
