//! Source classifier
//!
//! Normalizes the `resolved` location recorded in a lockfile into the
//! identifier reported as a package's registry source.
//!
//! Rules, first match wins:
//! 1. Under the registry base URL: `<base>/<name>` without the tarball suffix
//! 2. GitHub, GitLab or Bitbucket URL: the URL without its `#ref`
//! 3. Other http(s) URL: tarball suffix stripped when present
//! 4. `git+` URL: prefix and `#ref` stripped
//! 5. `file:` location: kept as is
//! 6. `npm:` alias: `<base>/<target>`
//! 7. Anything else: kept as is

use crate::domain::strip_alias_version;
use serde::Serialize;
use url::Url;

/// Hosts whose URLs carry a branch or commit in the fragment
const GIT_HOSTS: &[&str] = &["github.com", "gitlab.com", "bitbucket.org"];

/// Marker separating a package URL from its tarball file name
const TARBALL_MARKER: &str = "/-/";

/// A classified resolved location
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "source", rename_all = "camelCase")]
pub enum SourceLocation {
    /// Package page under the configured registry
    Registry(String),
    /// Repository URL on a known git host
    GitHost(String),
    /// Tarball or package URL on another server
    Tarball(String),
    /// Plain git remote
    Git(String),
    /// Local package
    LocalPath(String),
    /// Registry page of an aliased package
    Alias(String),
    /// Unrecognized location, kept verbatim
    Unknown(String),
}

impl SourceLocation {
    /// Classifies a resolved location against the registry base URL
    pub fn parse(location: &str, registry_base: &str) -> Self {
        let base = registry_base.trim_end_matches('/');
        let location = location.trim();

        if !base.is_empty() && is_under(location, base) {
            return SourceLocation::Registry(strip_tarball(location).to_string());
        }

        if location.starts_with("http://") || location.starts_with("https://") {
            let Ok(url) = Url::parse(location) else {
                return SourceLocation::Unknown(location.to_string());
            };
            let on_git_host = url
                .host_str()
                .is_some_and(|host| GIT_HOSTS.iter().any(|h| host.contains(h)));
            if on_git_host {
                return SourceLocation::GitHost(strip_fragment(location).to_string());
            }
            return SourceLocation::Tarball(strip_tarball(location).to_string());
        }

        if let Some(rest) = location.strip_prefix("git+") {
            return SourceLocation::Git(strip_fragment(rest).to_string());
        }

        if location.starts_with("file:") {
            return SourceLocation::LocalPath(location.to_string());
        }

        if let Some(target) = location.strip_prefix("npm:") {
            let name = strip_alias_version(target);
            return SourceLocation::Alias(format!("{}/{}", base, name));
        }

        SourceLocation::Unknown(location.to_string())
    }

    /// Normalized source string
    pub fn as_str(&self) -> &str {
        match self {
            SourceLocation::Registry(s)
            | SourceLocation::GitHost(s)
            | SourceLocation::Tarball(s)
            | SourceLocation::Git(s)
            | SourceLocation::LocalPath(s)
            | SourceLocation::Alias(s)
            | SourceLocation::Unknown(s) => s,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            SourceLocation::Registry(s)
            | SourceLocation::GitHost(s)
            | SourceLocation::Tarball(s)
            | SourceLocation::Git(s)
            | SourceLocation::LocalPath(s)
            | SourceLocation::Alias(s)
            | SourceLocation::Unknown(s) => s,
        }
    }
}

/// Normalized registry source for an optional resolved location
pub fn classify_source(location: Option<&str>, registry_base: &str) -> Option<String> {
    location
        .filter(|l| !l.trim().is_empty())
        .map(|l| SourceLocation::parse(l, registry_base).into_string())
}

/// Returns true if a normalized source points into the registry
pub fn is_registry_source(source: &str, registry_base: &str) -> bool {
    let base = registry_base.trim_end_matches('/');
    !base.is_empty() && is_under(source, base)
}

fn is_under(location: &str, base: &str) -> bool {
    location
        .strip_prefix(base)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

fn strip_tarball(location: &str) -> &str {
    match location.find(TARBALL_MARKER) {
        Some(idx) => &location[..idx],
        None => location,
    }
}

fn strip_fragment(location: &str) -> &str {
    match location.find('#') {
        Some(idx) => &location[..idx],
        None => location,
    }
}
