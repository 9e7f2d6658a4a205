// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

/// Primary key of a row in the `dataset` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetId(i64);

impl DatasetId {
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if value <= 0 {
            return Err(ValidationError(format!(
                "dataset id must be a positive integer, got {value}"
            )));
        }
        Ok(Self(value))
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let s = input.trim();
        let value = s
            .parse::<i64>()
            .map_err(|_| ValidationError(format!("dataset id must be numeric, got {s:?}")))?;
        Self::new(value)
    }

    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl Display for DatasetId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
