// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Classification of a `file_type.name`, driving which detail table a file joins to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Topology,
    Parameter,
    Trajectory,
    Archive,
    Other(String),
}

impl FileKind {
    #[must_use]
    pub fn from_type_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "gro" => Self::Topology,
            "mdp" => Self::Parameter,
            "xtc" => Self::Trajectory,
            "zip" => Self::Archive,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Topology => "gro",
            Self::Parameter => "mdp",
            Self::Trajectory => "xtc",
            Self::Archive => "zip",
            Self::Other(name) => name,
        }
    }

    #[must_use]
    pub fn detail_table(&self) -> Option<&'static str> {
        match self {
            Self::Topology => Some("topology_file"),
            Self::Parameter => Some("parameter_file"),
            Self::Trajectory => Some("trajectory_file"),
            Self::Archive | Self::Other(_) => None,
        }
    }
}

impl Display for FileKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}
