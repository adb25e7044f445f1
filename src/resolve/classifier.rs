//! Update classifier
//!
//! Assigns the semver distance between the installed and latest versions.

use super::selector::parse_production;
use crate::domain::UpdateStatus;

/// Classifies installed against latest
///
/// Returns `None` when either side is missing or not a production version.
pub fn classify_update(installed: Option<&str>, latest: Option<&str>) -> Option<UpdateStatus> {
    let installed = parse_production(installed?)?;
    let latest = parse_production(latest?)?;

    let status = if installed.major != latest.major {
        UpdateStatus::Major
    } else if installed.minor != latest.minor {
        UpdateStatus::Minor
    } else if installed.patch != latest.patch {
        UpdateStatus::Patch
    } else {
        UpdateStatus::UpToDate
    };

    Some(status)
}
