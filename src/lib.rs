//! Activity Gateway
//!
//! A small HTTP JSON service that aggregates developer activity:
//! - GitHub profile and repositories with recent commit counts
//! - Coding-time statistics from Wakapi or WakaTime
//! - EXIF metadata of locally stored photographs
//!
//! Upstream data is schema-checked and cached with stale-while-revalidate
//! semantics; local metadata is cached with a strict TTL and swept in the
//! background.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::{ApiSettings, AppState};
use domain::CachePolicy;
use infrastructure::{
    cache::{spawn_sweeper, sweep_interval, CacheStore, SweeperHandle},
    coding_stats::CodingStatsSourceFactory,
    github::GitHubClient,
    http_client::HttpClient,
    image::ImageLibrary,
    services::{ActivityService, ActivityServiceConfig, ActivitySources},
};
use tracing::info;

/// Create the application state with custom configuration
///
/// Must be called inside a Tokio runtime: the metadata sweeper is spawned
/// here and keeps running until the returned handle is shut down.
pub fn create_app_state_with_config(
    config: &AppConfig,
) -> anyhow::Result<(AppState, SweeperHandle)> {
    config.validate()?;

    let http_client = HttpClient::new(config.upstream.timeout(), &config.upstream.user_agent)?;

    let github = Arc::new(GitHubClient::new(
        http_client.clone(),
        config.github.base_url.clone(),
        config.github.token.as_deref(),
    ));
    let coding_stats = CodingStatsSourceFactory::create(&config.coding_stats, http_client)?;
    let images = Arc::new(ImageLibrary::new(config.images.root.clone()));

    info!(
        github_handle = %config.github.handle,
        github_token = config.github.token.is_some(),
        coding_stats_provider = coding_stats.provider_name(),
        image_root = %config.images.root.display(),
        "Upstream sources configured"
    );

    let proxy_cache = CacheStore::new(
        "proxy",
        CachePolicy::StaleWhileRevalidate,
        config.cache.max_capacity,
    );
    let metadata_cache =
        CacheStore::new("metadata", CachePolicy::StrictTtl, config.cache.max_capacity);

    let sweeper = spawn_sweeper(
        metadata_cache.clone(),
        sweep_interval(config.cache.metadata_ttl(), config.cache.sweep_divisor),
    );

    let service_config = ActivityServiceConfig::default()
        .with_proxy_ttl(config.cache.proxy_ttl())
        .with_metadata_ttl(config.cache.metadata_ttl())
        .with_commit_window(config.github.commit_window_days, config.github.commit_page_size);

    let service = ActivityService::new(
        ActivitySources {
            github,
            coding_stats,
            images,
        },
        proxy_cache,
        metadata_cache,
        service_config,
    );

    let state = AppState::new(Arc::new(service), ApiSettings::from_config(config));

    Ok((state, sweeper))
}
