// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryLimits {
    pub max_page_length: u64,
    pub max_search_len: usize,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            max_page_length: 1_000,
            max_search_len: 256,
        }
    }
}
