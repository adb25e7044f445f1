//! Update plan types

use super::{DependencyType, UpdateStatus};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How aggressive an update run is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateLevel {
    /// Move to the newest production version
    #[default]
    Latest,
    /// Stay within the installed major
    Minor,
    /// Stay within the installed major.minor
    Patch,
}

impl fmt::Display for UpdateLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UpdateLevel::Latest => "latest",
            UpdateLevel::Minor => "minor",
            UpdateLevel::Patch => "patch",
        };
        write!(f, "{}", label)
    }
}

/// One manifest change selected by the planner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlanEntry {
    pub package_name: String,
    pub dependency_type: DependencyType,
    pub current_version_string: String,
    pub new_version_string: String,
    pub update_type: UpdateStatus,
}

impl fmt::Display for UpdatePlanEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} -> {} [{}]",
            self.package_name, self.current_version_string, self.new_version_string, self.update_type
        )
    }
}
