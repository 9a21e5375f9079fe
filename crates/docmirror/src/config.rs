use std::path::{Path, PathBuf};
use std::time::Duration;

use docmirror_fetch::{BatchOptions, FetchOptions, PathMapper, RebuildPolicy};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::cli::Overrides;
use crate::error::{AppError, Result};

/// Every tunable of a mirror run.
///
/// Layered lowest to highest: built-in defaults, `docmirror.toml` (or `--config`),
/// `DOCMIRROR_*` environment variables, command-line flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub manifest_url: String,
    /// Root of the mirrored tree.
    pub output_dir: PathBuf,
    /// Local copy of the manifest. Its mtime drives the rebuild decision.
    pub sentinel: PathBuf,
    pub backup_dir: PathBuf,
    pub backup: bool,

    pub requests_per_second: u32,
    pub cache_hours: u64,
    pub max_retries: u32,
    pub retry_base_ms: u64,
    pub retry_cap_ms: Option<u64>,
    pub max_concurrent: Option<usize>,
    pub batch_timeout_secs: Option<u64>,

    pub default_section: String,
    pub locale_prefixes: Vec<String>,
    pub extension: String,

    pub user_agent: String,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            manifest_url: "https://docs.anthropic.com/llms.txt".to_string(),
            output_dir: PathBuf::from("docs"),
            sentinel: PathBuf::from("llms.txt"),
            backup_dir: PathBuf::from("."),
            backup: true,
            requests_per_second: 5,
            cache_hours: 1,
            max_retries: 3,
            retry_base_ms: 1000,
            retry_cap_ms: None,
            max_concurrent: None,
            batch_timeout_secs: None,
            default_section: "docs".to_string(),
            locale_prefixes: vec!["en".to_string()],
            extension: ".md".to_string(),
            user_agent: "AnthropicDocsScraper/1.0".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    const DEFAULT_FILE: &str = "docmirror.toml";
    const ENV_PREFIX: &str = "DOCMIRROR_";

    /// Resolve the layered configuration and validate it.
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        if let Some(path) = path
            && !path.is_file()
        {
            return Err(AppError::Config(format!(
                "config file {} does not exist",
                path.display()
            )));
        }

        let file = path.unwrap_or(Path::new(Self::DEFAULT_FILE));
        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(Self::ENV_PREFIX))
            .merge(Serialized::defaults(overrides))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.requests_per_second == 0 {
            return Err(AppError::Config(
                "requests_per_second must be at least 1".to_string(),
            ));
        }
        if !self.extension.starts_with('.') {
            return Err(AppError::Config(format!(
                "extension must start with '.', got {:?}",
                self.extension
            )));
        }
        if self.max_concurrent == Some(0) {
            return Err(AppError::Config(
                "max_concurrent must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }

    pub fn cache_window(&self) -> Duration {
        Duration::from_secs(self.cache_hours.saturating_mul(3600))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions::default()
            .max_retries(self.max_retries)
            .retry_backoff(Duration::from_millis(self.retry_base_ms))
            .max_backoff(self.retry_cap_ms.map(Duration::from_millis))
            .extension(self.extension.clone())
            .cache_window(self.cache_window())
    }

    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions::default()
            .max_concurrent(self.max_concurrent)
            .deadline(self.batch_timeout_secs.map(Duration::from_secs))
    }

    pub fn path_mapper(&self) -> PathMapper {
        PathMapper::new(&self.output_dir)
            .default_section(self.default_section.clone())
            .locale_prefixes(self.locale_prefixes.iter().cloned())
            .extension(self.extension.clone())
    }

    pub fn rebuild_policy(&self) -> RebuildPolicy {
        RebuildPolicy::new(&self.output_dir, &self.sentinel, self.cache_window())
    }
}
