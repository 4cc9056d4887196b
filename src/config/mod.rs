//! Configuration management for the cekfakta crawler
//!
//! Values are layered: per-site defaults, then an optional TOML file, then
//! `CEKFAKTA_*` environment variables. The CLI applies its own flags last.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::Source;
use crate::utils::retry::{RetryPolicy, DEFAULT_RETRY_STATUSES};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Target site
    pub site: SiteConfig,

    /// Crawl phase parameters
    pub crawl: CrawlConfig,

    /// HTTP session settings
    pub http: HttpConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Site selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Which site to crawl
    pub source: Source,

    /// Override for the listing root (mirrors, test servers)
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Page range, worker pool and pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Listing pages 1..=max_pages are crawled
    pub max_pages: u32,

    /// Worker pool size for both phases
    pub concurrency: usize,

    /// Lower bound of the per-request random delay
    pub delay_min_secs: f64,

    /// Upper bound of the per-request random delay
    pub delay_max_secs: f64,
}

/// HTTP session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    pub max_retries: u32,
    pub backoff_factor: f64,
    pub retry_statuses: Vec<u16>,
    pub user_agent: String,
    pub accept_language: String,
}

/// Result sink configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving chunk files and the failure manifest
    pub dir: PathBuf,

    /// File name prefix, e.g. `turnbackhoax_data`
    pub file_prefix: String,

    /// Rows per chunk file
    pub chunk_size: usize,

    /// Leave records without full text out of the chunk files
    pub skip_missing_text: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,

    /// Append-only log file
    #[serde(default)]
    pub file: Option<PathBuf>,
}

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const DEFAULT_ACCEPT_LANGUAGE: &str = "id-ID,id;q=0.9,en-US;q=0.8,en;q=0.7";

impl Config {
    /// Defaults tuned for one site
    pub fn for_source(source: Source) -> Self {
        let (max_pages, concurrency, delay, connect, max_retries, skip_missing_text) =
            match source {
                Source::TurnBackHoax => (500, 5, (2.0, 5.0), 10, 3, false),
                Source::Kompas => (1, 2, (3.0, 7.0), 15, 5, true),
            };

        Self {
            site: SiteConfig {
                source,
                base_url: None,
            },
            crawl: CrawlConfig {
                max_pages,
                concurrency,
                delay_min_secs: delay.0,
                delay_max_secs: delay.1,
            },
            http: HttpConfig {
                connect_timeout_secs: connect,
                read_timeout_secs: 30,
                max_retries,
                backoff_factor: 1.0,
                retry_statuses: DEFAULT_RETRY_STATUSES.to_vec(),
                user_agent: DEFAULT_USER_AGENT.to_string(),
                accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            },
            output: OutputConfig {
                dir: PathBuf::from("output"),
                file_prefix: source.default_file_prefix().to_string(),
                chunk_size: 2000,
                skip_missing_text,
            },
            logging: LoggingConfig {
                level: String::from("info"),
                format: String::from("text"),
                file: None,
            },
        }
    }

    /// Load configuration from a TOML file.
    ///
    /// Sections left out of the file fall back to the defaults of the file's
    /// `site.source` (TurnBackHoax when the file names none).
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::load(Some(path), None)
    }

    /// Parse TOML text, filling gaps from the per-site defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_toml_for(content, None)
    }

    /// Parse TOML text for `source`, overriding the file's `site.source`
    ///
    /// With `None` the file decides, and TurnBackHoax is used when it
    /// names no site.
    pub fn from_toml_for(content: &str, source: Option<Source>) -> Result<Self> {
        let mut raw: toml::Value = toml::from_str(content)?;

        let file_source = raw
            .get("site")
            .and_then(|site| site.get("source"))
            .and_then(|v| v.as_str())
            .map(str::parse::<Source>)
            .transpose()
            .map_err(anyhow::Error::msg)?;
        let source = source.or(file_source).unwrap_or(Source::TurnBackHoax);

        if let Some(site) = raw.get_mut("site").and_then(|v| v.as_table_mut()) {
            site.insert(
                "source".to_string(),
                toml::Value::String(source.as_str().to_string()),
            );
        }

        let mut merged = toml::Value::try_from(Self::for_source(source))?;
        merge_toml(&mut merged, raw);

        Ok(merged.try_into()?)
    }

    /// Defaults for `source`, overlaid with `path` when given
    pub fn load(path: Option<&Path>, source: Option<Source>) -> Result<Self> {
        match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                Self::from_toml_for(&content, source).with_context(|| {
                    format!("Failed to parse TOML config file: {}", path.display())
                })
            }
            None => Ok(Self::for_source(source.unwrap_or(Source::TurnBackHoax))),
        }
    }

    /// Apply `CEKFAKTA_*` environment overrides
    pub fn apply_env(&mut self) {
        if let Some(v) = env_parse::<u32>("CEKFAKTA_MAX_PAGES") {
            self.crawl.max_pages = v;
        }
        if let Some(v) = env_parse::<usize>("CEKFAKTA_CONCURRENCY") {
            self.crawl.concurrency = v;
        }
        if let Some(v) = env_parse::<u32>("CEKFAKTA_MAX_RETRIES") {
            self.http.max_retries = v;
        }
        if let Ok(v) = std::env::var("CEKFAKTA_OUTPUT_DIR") {
            self.output.dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("CEKFAKTA_BASE_URL") {
            self.site.base_url = Some(v);
        }
        if let Ok(v) = std::env::var("CEKFAKTA_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Ok(v) = std::env::var("CEKFAKTA_LOG_FILE") {
            self.logging.file = Some(PathBuf::from(v));
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.crawl.max_pages == 0 {
            anyhow::bail!("max_pages must be greater than 0");
        }

        if self.crawl.concurrency == 0 {
            anyhow::bail!("concurrency must be greater than 0");
        }

        if self.crawl.delay_min_secs < 0.0 || !self.crawl.delay_min_secs.is_finite() {
            anyhow::bail!("delay_min_secs must be a non-negative number");
        }

        if self.crawl.delay_min_secs > self.crawl.delay_max_secs
            || !self.crawl.delay_max_secs.is_finite()
        {
            anyhow::bail!(
                "delay range is invalid: min {} > max {}",
                self.crawl.delay_min_secs,
                self.crawl.delay_max_secs
            );
        }

        if self.http.connect_timeout_secs == 0 || self.http.read_timeout_secs == 0 {
            anyhow::bail!("timeouts must be greater than 0");
        }

        if self.http.backoff_factor < 0.0 || !self.http.backoff_factor.is_finite() {
            anyhow::bail!("backoff_factor must be a non-negative number");
        }

        if let Some(status) = self
            .http
            .retry_statuses
            .iter()
            .find(|s| !(100..=599).contains(*s))
        {
            anyhow::bail!("retry status {status} is not a valid HTTP status code");
        }

        if self.output.chunk_size == 0 {
            anyhow::bail!("chunk_size must be greater than 0");
        }

        if self.output.file_prefix.trim().is_empty() {
            anyhow::bail!("file_prefix must not be empty");
        }

        if let Some(base) = &self.site.base_url {
            url::Url::parse(base).with_context(|| format!("Invalid base_url: {base}"))?;
        }

        Ok(())
    }

    /// Listing root in effect for this run
    pub fn base_url(&self) -> &str {
        self.site
            .base_url
            .as_deref()
            .unwrap_or_else(|| self.site.source.default_base_url())
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.http.connect_timeout_secs)
    }

    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.http.read_timeout_secs)
    }

    /// Retry policy for the HTTP session
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.http.max_retries, self.http.backoff_factor)
            .with_statuses(&self.http.retry_statuses)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::for_source(Source::TurnBackHoax)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

/// Overlay `overlay` onto `base`, table by table
fn merge_toml(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        for source in Source::all() {
            let config = Config::for_source(source);
            assert!(config.validate().is_ok(), "{source} defaults should validate");
        }
    }

    #[test]
    fn test_site_defaults_differ() {
        let tbh = Config::for_source(Source::TurnBackHoax);
        let kompas = Config::for_source(Source::Kompas);

        assert_eq!(tbh.crawl.max_pages, 500);
        assert_eq!(tbh.crawl.concurrency, 5);
        assert!(!tbh.output.skip_missing_text);

        assert_eq!(kompas.crawl.concurrency, 2);
        assert_eq!(kompas.http.max_retries, 5);
        assert!(kompas.output.skip_missing_text);
        assert_eq!(kompas.output.file_prefix, "kompas_cekfakta_data");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = Config::default();
        config.crawl.concurrency = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.crawl.delay_min_secs = 6.0;
        config.crawl.delay_max_secs = 2.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.output.chunk_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.http.retry_statuses = vec![503, 999];
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.site.base_url = Some("not a url".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_site_defaults() {
        let config = Config::from_toml_str(
            r#"
            [site]
            source = "kompas"

            [crawl]
            max_pages = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.site.source, Source::Kompas);
        assert_eq!(config.crawl.max_pages, 4);
        assert_eq!(config.crawl.concurrency, 2);
        assert_eq!(config.crawl.delay_min_secs, 3.0);
        assert!(config.output.skip_missing_text);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[output]\nchunk_size = 500\ndir = \"data\"\n\n[logging]\nformat = \"json\""
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.site.source, Source::TurnBackHoax);
        assert_eq!(config.output.chunk_size, 500);
        assert_eq!(config.output.dir, PathBuf::from("data"));
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.crawl.max_pages, 500);
    }

    #[test]
    fn test_explicit_source_overrides_file() {
        let config = Config::from_toml_for(
            "[site]\nsource = \"turnbackhoax\"\n\n[crawl]\nmax_pages = 3",
            Some(Source::Kompas),
        )
        .unwrap();

        assert_eq!(config.site.source, Source::Kompas);
        assert_eq!(config.crawl.max_pages, 3);
        assert_eq!(config.output.file_prefix, "kompas_cekfakta_data");
    }

    #[test]
    fn test_load_without_file() {
        let config = Config::load(None, Some(Source::Kompas)).unwrap();
        assert_eq!(config.crawl.delay_max_secs, 7.0);
    }

    #[test]
    fn test_unknown_source_rejected() {
        assert!(Config::from_toml_str("[site]\nsource = \"detik\"").is_err());
    }

    #[test]
    fn test_base_url_override() {
        let mut config = Config::for_source(Source::Kompas);
        assert_eq!(config.base_url(), Source::Kompas.default_base_url());

        config.site.base_url = Some("http://127.0.0.1:8080/cekfakta".to_string());
        assert_eq!(config.base_url(), "http://127.0.0.1:8080/cekfakta");
    }

    #[test]
    fn test_retry_policy_from_config() {
        let config = Config::for_source(Source::Kompas);
        let policy = config.retry_policy();
        assert_eq!(policy.max_retries, 5);
        assert!(policy.should_retry_status(429));
    }
}
