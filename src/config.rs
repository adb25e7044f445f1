//! Run configuration
//!
//! Settings are resolved in priority order:
//! 1. CLI flags (`--registry`, `--concurrency`)
//! 2. `pkgscout.toml` in the project directory
//! 3. `.npmrc` in the project directory (`registry=` only)
//! 4. Built-in defaults

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default npm registry
pub const DEFAULT_REGISTRY: &str = "https://registry.npmjs.org";

/// Default number of in-flight registry requests
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Default timeout for one registry request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default retry count for failed registry requests
pub const DEFAULT_RETRIES: u32 = 3;

/// Config file read from the project directory
pub const CONFIG_FILENAME: &str = "pkgscout.toml";

/// Resolved settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Registry base URL without trailing slash
    pub registry: String,
    /// Maximum in-flight registry requests
    pub concurrency: usize,
    /// Per-request timeout
    pub timeout: Duration,
    /// Retries after a failed request
    pub retries: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            registry: DEFAULT_REGISTRY.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_RETRIES,
        }
    }
}

/// `pkgscout.toml` contents
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    registry: RegistrySection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistrySection {
    url: Option<String>,
    concurrency: Option<usize>,
    timeout_secs: Option<u64>,
    retries: Option<u32>,
}

/// Overrides supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub registry: Option<String>,
    pub concurrency: Option<usize>,
}

impl Settings {
    /// Resolve settings for a project directory
    pub fn load(dir: &Path, overrides: &SettingsOverrides) -> Result<Self, ConfigError> {
        let mut settings = Settings::default();

        if let Some(registry) = read_npmrc_registry(dir) {
            settings.registry = registry;
        }

        let config_path = dir.join(CONFIG_FILENAME);
        if config_path.exists() {
            let content =
                std::fs::read_to_string(&config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;
            let file: ConfigFile =
                toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                    path: config_path.clone(),
                    message: e.to_string(),
                })?;
            settings.apply_file(file);
        }

        if let Some(ref registry) = overrides.registry {
            settings.registry = registry.clone();
        }
        if let Some(concurrency) = overrides.concurrency {
            settings.concurrency = concurrency;
        }

        settings.validate()
    }

    fn apply_file(&mut self, file: ConfigFile) {
        let section = file.registry;
        if let Some(url) = section.url {
            self.registry = url;
        }
        if let Some(concurrency) = section.concurrency {
            self.concurrency = concurrency;
        }
        if let Some(secs) = section.timeout_secs {
            self.timeout = Duration::from_secs(secs);
        }
        if let Some(retries) = section.retries {
            self.retries = retries;
        }
    }

    fn validate(mut self) -> Result<Self, ConfigError> {
        let parsed = Url::parse(&self.registry).map_err(|e| ConfigError::InvalidRegistry {
            value: self.registry.clone(),
            message: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidRegistry {
                value: self.registry.clone(),
                message: "expected an http(s) URL".to_string(),
            });
        }
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency { value: 0 });
        }
        self.registry = self.registry.trim_end_matches('/').to_string();
        Ok(self)
    }
}

/// Read `registry=` from .npmrc
fn read_npmrc_registry(dir: &Path) -> Option<String> {
    let content = std::fs::read_to_string(dir.join(".npmrc")).ok()?;

    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(value) = line.strip_prefix("registry") {
            let value = value.trim_start();
            if let Some(value) = value.strip_prefix('=') {
                let value = value.trim().trim_matches('"').trim_matches('\'');
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }

    None
}
