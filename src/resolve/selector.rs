//! Version selector
//!
//! Picks the newest patch, minor and overall production version relative to
//! an installed version. Production versions are those without a `-`
//! prerelease tag that parse as three numeric components.

use semver::Version;

/// Newest versions available relative to the installed one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionSelection {
    /// Highest patch within the installed major.minor
    pub last_patch: Option<String>,
    /// Highest minor within the installed major
    pub last_minor: Option<String>,
    /// Highest production version overall
    pub latest: Option<String>,
}

impl VersionSelection {
    /// Selection for a package whose versions cannot be compared
    pub fn unknown() -> Self {
        Self::default()
    }
}

/// Parses a production version
///
/// Returns `None` for prereleases and anything that is not three numeric
/// components. Build metadata is tolerated.
pub fn parse_production(raw: &str) -> Option<Version> {
    let raw = raw.trim();
    if raw.contains('-') {
        return None;
    }
    Version::parse(raw).ok().filter(|v| v.pre.is_empty())
}

/// A candidate with the sort key used for selection
struct Candidate<'a> {
    version: Version,
    raw: &'a str,
}

impl Candidate<'_> {
    fn key(&self) -> (u64, u64, u64, &str) {
        (
            self.version.major,
            self.version.minor,
            self.version.patch,
            self.raw,
        )
    }
}

/// Selects the newest patch, minor and overall versions
///
/// Without an installed version only `latest` is selected. An installed
/// version that is not a production version skips all three selections.
pub fn select_versions<'a, I>(installed: Option<&str>, available: I) -> VersionSelection
where
    I: IntoIterator<Item = &'a str>,
{
    let current = match installed {
        Some(raw) => match parse_production(raw) {
            Some(version) => Some(version),
            None => return VersionSelection::unknown(),
        },
        None => None,
    };

    let candidates: Vec<Candidate<'a>> = available
        .into_iter()
        .filter_map(|raw| {
            parse_production(raw).map(|version| Candidate {
                version,
                raw: raw.trim(),
            })
        })
        .collect();

    let latest = newest(&candidates, |_| true);
    let Some(current) = current else {
        return VersionSelection {
            latest,
            ..VersionSelection::default()
        };
    };

    VersionSelection {
        last_patch: newest(&candidates, |v| {
            v.major == current.major && v.minor == current.minor && v.patch > current.patch
        }),
        last_minor: newest(&candidates, |v| {
            v.major == current.major && v.minor > current.minor
        }),
        latest,
    }
}

fn newest(candidates: &[Candidate<'_>], pred: impl Fn(&Version) -> bool) -> Option<String> {
    candidates
        .iter()
        .filter(|c| pred(&c.version))
        .max_by(|a, b| a.key().cmp(&b.key()))
        .map(|c| c.raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select(installed: &str, available: &[&str]) -> VersionSelection {
        select_versions(Some(installed), available.iter().copied())
    }

    #[test]
    fn test_select_all_tiers() {
        let s = select("1.2.3", &["1.2.3", "1.2.4", "1.3.0", "2.0.0"]);
        assert_eq!(s.last_patch.as_deref(), Some("1.2.4"));
        assert_eq!(s.last_minor.as_deref(), Some("1.3.0"));
        assert_eq!(s.latest.as_deref(), Some("2.0.0"));
    }

    #[test]
    fn test_select_already_newest() {
        let s = select("2.0.0", &["2.0.0"]);
        assert_eq!(s.last_patch, None);
        assert_eq!(s.last_minor, None);
        assert_eq!(s.latest.as_deref(), Some("2.0.0"));
    }

    #[test]
    fn test_numeric_not_lexicographic() {
        let s = select("1.2.3", &["1.2.9", "1.2.10", "1.9.0", "1.10.0", "9.0.0", "10.0.0"]);
        assert_eq!(s.last_patch.as_deref(), Some("1.2.10"));
        assert_eq!(s.last_minor.as_deref(), Some("1.10.0"));
        assert_eq!(s.latest.as_deref(), Some("10.0.0"));
    }

    #[test]
    fn test_prereleases_discarded() {
        let s = select("1.2.3", &["1.2.4-beta.1", "1.3.0-rc.1", "3.0.0-alpha", "1.2.3"]);
        assert_eq!(s.last_patch, None);
        assert_eq!(s.last_minor, None);
        assert_eq!(s.latest.as_deref(), Some("1.2.3"));
    }

    #[test]
    fn test_minor_stays_within_major() {
        let s = select("1.2.3", &["0.9.0", "1.1.0", "2.5.0"]);
        assert_eq!(s.last_minor, None);
        assert_eq!(s.last_patch, None);
        assert_eq!(s.latest.as_deref(), Some("2.5.0"));
    }

    #[test]
    fn test_unparseable_installed_skips_everything() {
        let s = select("latest", &["1.0.0", "2.0.0"]);
        assert_eq!(s, VersionSelection::unknown());
        let s = select("1.2", &["1.0.0", "2.0.0"]);
        assert_eq!(s, VersionSelection::unknown());
        let s = select("2.0.0-beta.1", &["2.0.0"]);
        assert_eq!(s, VersionSelection::unknown());
    }

    #[test]
    fn test_absent_installed_keeps_latest() {
        let s = select_versions(None, ["1.0.0", "2.0.0", "3.0.0-rc.1"]);
        assert_eq!(s.last_patch, None);
        assert_eq!(s.last_minor, None);
        assert_eq!(s.latest.as_deref(), Some("2.0.0"));
    }

    #[test]
    fn test_garbage_versions_ignored() {
        let s = select("1.0.0", &["not-a-version", "1.x", "", "1.0.1"]);
        assert_eq!(s.last_patch.as_deref(), Some("1.0.1"));
        assert_eq!(s.latest.as_deref(), Some("1.0.1"));
    }

    #[test]
    fn test_selection_is_deterministic() {
        let mut available = vec!["1.0.0", "1.0.1", "1.1.0", "2.0.0", "1.0.1+build.5"];
        let first = select("1.0.0", &available);
        available.reverse();
        let second = select("1.0.0", &available);
        assert_eq!(first, second);
        assert_eq!(first, select("1.0.0", &available));
    }

    #[test]
    fn test_parse_production() {
        assert!(parse_production("1.2.3").is_some());
        assert!(parse_production("1.2.3+build").is_some());
        assert!(parse_production("1.2.3-rc.1").is_none());
        assert!(parse_production("v1.2.3").is_none());
        assert!(parse_production("1.2").is_none());
    }
}
