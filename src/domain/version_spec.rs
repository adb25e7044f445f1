//! Declared version specifications from package.json
//!
//! Handles the forms npm accepts in a dependency map:
//! - Ranges: `^1.2.3`, `~1.2.3`, `1.2.3`, `>=1.0.0 <2.0.0`, `*`, `1.x`
//! - Dist-tags: `latest`, `next`
//! - Git: `git+https://…`, `git://…`, `github:user/repo`, `user/repo`
//! - Tarballs: `https://…/pkg.tgz`
//! - Local paths: `file:../pkg`, `link:../pkg`, `./pkg`
//! - Aliases: `npm:other-pkg@^1.0.0`

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static SIMPLE_RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([\^~]?)v?(\d+\.\d+\.\d+(?:[-+][\w.+-]+)?)$").unwrap());
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_.-]*$").unwrap());

const GIT_PREFIXES: &[&str] = &[
    "git+", "git://", "github:", "gitlab:", "bitbucket:", "gist:",
];
const LOCAL_PREFIXES: &[&str] = &["file:", "link:", "./", "../", "/", "~/"];

/// Range operator preserved when rewriting a simple range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangePrefix {
    /// `^1.2.3`
    Caret,
    /// `~1.2.3`
    Tilde,
    /// `1.2.3`
    Exact,
}

impl RangePrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            RangePrefix::Caret => "^",
            RangePrefix::Tilde => "~",
            RangePrefix::Exact => "",
        }
    }
}

/// A parsed dependency specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VersionSpec {
    /// Single-version range with an optional `^` / `~` operator
    Range { prefix: RangePrefix, version: String },
    /// Any other semver range expression (`>=1 <2`, `1.x`, `*`, `1 || 2`)
    Complex { raw: String },
    /// Registry dist-tag such as `latest`
    Tag { tag: String },
    /// Git repository reference
    Git { url: String },
    /// Remote tarball URL
    Tarball { url: String },
    /// Local directory or tarball
    LocalPath { path: String },
    /// `npm:` alias to another registry package
    Alias { target: String },
}

impl VersionSpec {
    /// Parses a raw dependency specification; never fails
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();

        if let Some(target) = trimmed.strip_prefix("npm:") {
            return VersionSpec::Alias {
                target: target.to_string(),
            };
        }
        if LOCAL_PREFIXES.iter().any(|p| trimmed.starts_with(p)) {
            return VersionSpec::LocalPath {
                path: trimmed.to_string(),
            };
        }
        if GIT_PREFIXES.iter().any(|p| trimmed.starts_with(p)) {
            return VersionSpec::Git {
                url: trimmed.to_string(),
            };
        }
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return VersionSpec::Tarball {
                url: trimmed.to_string(),
            };
        }
        // GitHub shorthand: `user/repo` or `user/repo#ref`
        if trimmed.contains('/') && !trimmed.starts_with('@') && !trimmed.contains(' ') {
            return VersionSpec::Git {
                url: trimmed.to_string(),
            };
        }

        if let Some(caps) = SIMPLE_RANGE_RE.captures(trimmed) {
            let prefix = match &caps[1] {
                "^" => RangePrefix::Caret,
                "~" => RangePrefix::Tilde,
                _ => RangePrefix::Exact,
            };
            return VersionSpec::Range {
                prefix,
                version: caps[2].to_string(),
            };
        }

        if TAG_RE.is_match(trimmed) && !trimmed.contains(['.', '*']) && trimmed != "x" {
            return VersionSpec::Tag {
                tag: trimmed.to_string(),
            };
        }

        VersionSpec::Complex {
            raw: trimmed.to_string(),
        }
    }

    /// Returns true if the spec is a version range resolved against the registry
    pub fn is_registry_range(&self) -> bool {
        matches!(self, VersionSpec::Range { .. } | VersionSpec::Complex { .. })
    }

    /// Prefix to keep when rewriting `raw` to a concrete version
    ///
    /// Non-semver specs (URLs, git, `file:`, `npm:` or anything containing
    /// `:` or `/`) never keep a prefix.
    pub fn preserved_prefix(raw: &str) -> &'static str {
        let raw = raw.trim();
        let non_semver = raw.contains(':')
            || raw.contains('/')
            || raw.starts_with("git")
            || raw.starts_with("file:")
            || raw.starts_with("npm:");
        if non_semver {
            ""
        } else if raw.starts_with('^') {
            "^"
        } else if raw.starts_with('~') {
            "~"
        } else {
            ""
        }
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSpec::Range { prefix, version } => write!(f, "{}{}", prefix.as_str(), version),
            VersionSpec::Complex { raw } => write!(f, "{}", raw),
            VersionSpec::Tag { tag } => write!(f, "{}", tag),
            VersionSpec::Git { url } | VersionSpec::Tarball { url } => write!(f, "{}", url),
            VersionSpec::LocalPath { path } => write!(f, "{}", path),
            VersionSpec::Alias { target } => write!(f, "npm:{}", target),
        }
    }
}
