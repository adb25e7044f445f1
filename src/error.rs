//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: package.json reading, parsing and writing
//! - LockfileError: lockfile / dependency listing failures
//! - RegistryError: per-package registry communication failures
//! - ConfigError: configuration file and CLI option problems
//! - ReportError: report file output failures

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Lockfile(#[from] LockfileError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

impl AppError {
    /// Remediation hint printed under fatal errors
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            AppError::Manifest(ManifestError::NotFound { .. }) => {
                Some("run pkgscout inside a project directory or pass --cwd")
            }
            AppError::Manifest(ManifestError::JsonParseError { .. }) => {
                Some("fix the JSON syntax in package.json")
            }
            AppError::Lockfile(LockfileError::NotFound { .. }) => {
                Some("run `npm install` to generate package-lock.json")
            }
            AppError::Lockfile(LockfileError::VersionMismatch { .. }) => {
                Some("regenerate the lockfile with `npm install` and try again")
            }
            AppError::Lockfile(LockfileError::ListerFailed { .. }) => {
                Some("make sure npm is installed and on PATH")
            }
            AppError::Report(ReportError::AlreadyExists { .. }) => {
                Some("pass --force to overwrite the existing report")
            }
            _ => None,
        }
    }
}

/// Errors related to package.json
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("manifest file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write manifest file {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON in {path}: {message}")]
    JsonParseError { path: PathBuf, message: String },

    #[error("package '{package}' is not declared in {section}")]
    MissingDependency { package: String, section: String },
}

/// Errors related to the lockfile and the dependency lister
#[derive(Error, Debug)]
pub enum LockfileError {
    #[error("lockfile not found in {dir}")]
    NotFound { dir: PathBuf },

    #[error("failed to read lockfile {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse lockfile {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("dependency listing failed: {message}")]
    ListerFailed { message: String },

    #[error("lockfile is out of sync with package.json: {}", .mismatches.join("; "))]
    VersionMismatch { mismatches: Vec<String> },
}

/// Errors related to package registry communication
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("package '{package}' not found in {registry}")]
    PackageNotFound { package: String, registry: String },

    #[error("failed to fetch package '{package}' from {registry}: {message}")]
    NetworkError {
        package: String,
        registry: String,
        message: String,
    },

    #[error("rate limit exceeded for {registry}")]
    RateLimitExceeded { registry: String },

    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid registry URL '{value}': {message}")]
    InvalidRegistry { value: String, message: String },

    #[error("invalid concurrency {value}: must be at least 1")]
    InvalidConcurrency { value: usize },
}

/// Errors related to writing report files
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("report file already exists: {path}")]
    AlreadyExists { path: PathBuf },

    #[error("failed to write report {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode report: {message}")]
    EncodeError { message: String },
}

impl ManifestError {
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::WriteError {
            path: path.into(),
            source,
        }
    }

    pub fn json_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::JsonParseError {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl LockfileError {
    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        LockfileError::ParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn lister_failed(message: impl Into<String>) -> Self {
        LockfileError::ListerFailed {
            message: message.into(),
        }
    }
}

impl RegistryError {
    pub fn package_not_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::PackageNotFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    pub fn network_error(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    pub fn invalid_response(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::InvalidResponse {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    pub fn rate_limit_exceeded(registry: impl Into<String>) -> Self {
        RegistryError::RateLimitExceeded {
            registry: registry.into(),
        }
    }

    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }
}
