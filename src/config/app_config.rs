use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::DomainError;
use crate::infrastructure::github::DEFAULT_GITHUB_BASE_URL;
use crate::infrastructure::observability::MetricsConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub coding_stats: CodingStatsConfig,
    #[serde(default)]
    pub images: ImagesConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Settings shared by every outbound HTTP call
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Account whose profile is served
    pub handle: String,
    pub base_url: String,
    /// Optional bearer token, usually supplied through `GITHUB_TOKEN`
    pub token: Option<String>,
    pub commit_window_days: u32,
    pub commit_page_size: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodingStatsProvider {
    /// Public Wakapi instance, no credentials
    #[default]
    Wakapi,
    /// Official WakaTime API, requires username and API key
    Wakatime,
}

impl CodingStatsProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodingStatsProvider::Wakapi => "wakapi",
            CodingStatsProvider::Wakatime => "wakatime",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CodingStatsConfig {
    pub provider: CodingStatsProvider,
    /// Overrides the provider's public base URL
    pub base_url: Option<String>,
    pub username: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// Directory all image paths are resolved against
    pub root: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Freshness window of proxied upstream data
    pub proxy_ttl_secs: u64,
    /// Advertised stale-while-revalidate window for proxied data
    pub stale_window_secs: u64,
    /// Hard lifetime of image metadata entries
    pub metadata_ttl_secs: u64,
    /// Sweeps per metadata TTL
    pub sweep_divisor: u32,
    pub max_capacity: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Mounts the cache invalidation endpoint
    pub enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: concat!("activity-gateway/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            handle: "octocat".to_string(),
            base_url: DEFAULT_GITHUB_BASE_URL.to_string(),
            token: None,
            commit_window_days: 30,
            commit_page_size: 100,
        }
    }
}

impl Default for CodingStatsConfig {
    fn default() -> Self {
        Self {
            provider: CodingStatsProvider::default(),
            base_url: None,
            username: Some("octocat".to_string()),
            api_key: None,
        }
    }
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("public"),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            proxy_ttl_secs: 1800,
            stale_window_secs: 300,
            metadata_ttl_secs: 3600,
            sweep_divisor: 12,
            max_capacity: 10_000,
        }
    }
}

impl CacheConfig {
    pub fn proxy_ttl(&self) -> Duration {
        Duration::from_secs(self.proxy_ttl_secs)
    }

    pub fn metadata_ttl(&self) -> Duration {
        Duration::from_secs(self.metadata_ttl_secs)
    }

    /// `Cache-Control` value for proxied upstream responses
    pub fn proxy_cache_control(&self) -> String {
        format!(
            "public, s-maxage={}, stale-while-revalidate={}",
            self.proxy_ttl_secs, self.stale_window_secs
        )
    }

    /// `Cache-Control` value for image metadata responses
    pub fn metadata_cache_control(&self) -> String {
        format!("public, max-age={}", self.metadata_ttl_secs)
    }
}

fn non_empty(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("github.token", std::env::var("GITHUB_TOKEN").ok())?
            .set_override_option(
                "coding_stats.username",
                std::env::var("WAKATIME_USERNAME").ok(),
            )?
            .set_override_option(
                "coding_stats.api_key",
                std::env::var("WAKATIME_API_KEY").ok(),
            )?
            .build()?;

        config.try_deserialize()
    }

    /// Checks values that would only fail later, at request time
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.upstream.timeout_secs == 0 {
            return Err(DomainError::configuration(
                "upstream.timeout_secs must be greater than zero",
            ));
        }

        if self.github.handle.trim().is_empty() {
            return Err(DomainError::configuration("github.handle is required"));
        }

        if self.github.commit_page_size == 0 || self.github.commit_page_size > 100 {
            return Err(DomainError::configuration(
                "github.commit_page_size must be between 1 and 100",
            ));
        }

        if !non_empty(&self.coding_stats.username) {
            return Err(DomainError::configuration(
                "coding_stats.username is required",
            ));
        }

        if self.coding_stats.provider == CodingStatsProvider::Wakatime
            && !non_empty(&self.coding_stats.api_key)
        {
            return Err(DomainError::configuration(
                "WAKATIME_USERNAME and WAKATIME_API_KEY are required for the wakatime provider",
            ));
        }

        if self.cache.proxy_ttl_secs == 0 || self.cache.metadata_ttl_secs == 0 {
            return Err(DomainError::configuration("cache TTLs must be greater than zero"));
        }

        if self.cache.max_capacity == 0 {
            return Err(DomainError::configuration(
                "cache.max_capacity must be greater than zero",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.github.commit_window_days, 30);
        assert_eq!(config.github.commit_page_size, 100);
        assert_eq!(config.cache.proxy_ttl(), Duration::from_secs(1800));
        assert_eq!(config.cache.metadata_ttl(), Duration::from_secs(3600));
        assert!(!config.admin.enabled);
    }

    #[test]
    fn test_cache_control_values() {
        let cache = CacheConfig::default();

        assert_eq!(
            cache.proxy_cache_control(),
            "public, s-maxage=1800, stale-while-revalidate=300"
        );
        assert_eq!(cache.metadata_cache_control(), "public, max-age=3600");
    }

    #[test]
    fn test_wakatime_requires_credentials() {
        let mut config = AppConfig::default();
        config.coding_stats.provider = CodingStatsProvider::Wakatime;
        config.coding_stats.api_key = None;

        let err = config.validate().unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));

        config.coding_stats.api_key = Some("waka_key".to_string());
        assert!(config.validate().is_ok());

        config.coding_stats.username = Some(" ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_page_size_bounds() {
        let mut config = AppConfig::default();
        config.github.commit_page_size = 101;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_sections_deserialize() {
        let config: AppConfig = serde_json::from_str(
            r#"{
                "coding_stats": {"provider": "wakatime", "username": "dev"},
                "cache": {"proxy_ttl_secs": 60},
                "logging": {"level": "debug", "format": "json"}
            }"#,
        )
        .unwrap();

        assert_eq!(config.coding_stats.provider, CodingStatsProvider::Wakatime);
        assert_eq!(config.cache.proxy_ttl_secs, 60);
        assert_eq!(config.cache.metadata_ttl_secs, 3600);
        assert!(matches!(config.logging.format, LogFormat::Json));
        assert_eq!(config.github.handle, "octocat");
    }
}
