//! Application state for shared services

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::{CodingStat, DomainError, ImageMetadata, Profile, Repository, StatsRange};
use crate::infrastructure::services::ActivityService;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub activity: Arc<dyn ActivityServiceTrait>,
    pub settings: Arc<ApiSettings>,
}

/// Request-independent values the handlers need
#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// GitHub account served by `/api/github-profile`
    pub github_handle: String,
    /// Account whose coding statistics are served
    pub coding_stats_username: String,
    pub proxy_cache_control: String,
    pub metadata_cache_control: String,
    pub image_root: PathBuf,
}

impl ApiSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            github_handle: config.github.handle.clone(),
            coding_stats_username: config.coding_stats.username.clone().unwrap_or_default(),
            proxy_cache_control: config.cache.proxy_cache_control(),
            metadata_cache_control: config.cache.metadata_cache_control(),
            image_root: config.images.root.clone(),
        }
    }
}

/// Trait for the aggregation service (for mocking)
#[async_trait::async_trait]
pub trait ActivityServiceTrait: Send + Sync {
    async fn profile(&self, handle: &str) -> Result<Profile, DomainError>;
    async fn repositories(&self, identifiers: &[String]) -> Result<Vec<Repository>, DomainError>;
    async fn coding_stats(&self, handle: &str, range: StatsRange)
        -> Result<CodingStat, DomainError>;
    async fn image_metadata(&self, path: &str) -> Result<ImageMetadata, DomainError>;
    async fn invalidate_tag(&self, tag: &str) -> usize;
    /// Number of entries currently held across all caches
    fn cached_entries(&self) -> usize;
}

#[async_trait::async_trait]
impl ActivityServiceTrait for ActivityService {
    async fn profile(&self, handle: &str) -> Result<Profile, DomainError> {
        self.fetch_profile(handle).await
    }

    async fn repositories(&self, identifiers: &[String]) -> Result<Vec<Repository>, DomainError> {
        self.fetch_repositories(identifiers).await
    }

    async fn coding_stats(
        &self,
        handle: &str,
        range: StatsRange,
    ) -> Result<CodingStat, DomainError> {
        self.fetch_coding_stats(handle, range).await
    }

    async fn image_metadata(&self, path: &str) -> Result<ImageMetadata, DomainError> {
        self.fetch_image_metadata(path).await
    }

    async fn invalidate_tag(&self, tag: &str) -> usize {
        ActivityService::invalidate_tag(self, tag).await
    }

    fn cached_entries(&self) -> usize {
        ActivityService::cached_entries(self)
    }
}

impl AppState {
    pub fn new(activity: Arc<dyn ActivityServiceTrait>, settings: ApiSettings) -> Self {
        Self {
            activity,
            settings: Arc::new(settings),
        }
    }
}
