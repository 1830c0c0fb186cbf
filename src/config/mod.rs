//! Layered application configuration

mod app_config;

pub use app_config::{
    AdminConfig, AppConfig, CacheConfig, CodingStatsConfig, CodingStatsProvider, GitHubConfig,
    ImagesConfig, LogFormat, LoggingConfig, ServerConfig, UpstreamConfig,
};
