//! Activity service - Cached aggregation of GitHub, coding-time and photo data

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::try_join_all;
use tracing::{debug, instrument, warn};

use crate::domain::github::{normalize_repository_list, validate_handle};
use crate::domain::{
    CacheKeyParams, CodingStat, CodingStatsSource, DomainError, GitHubSource, ImageMetadata,
    ImageMetadataSource, ImagePath, Profile, Repository, StatsRange, WindowQuery,
};
use crate::infrastructure::cache::CacheStore;

pub const TAG_GITHUB: &str = "github";
pub const TAG_PROFILE: &str = "profile";
pub const TAG_REPOSITORIES: &str = "repositories";
pub const TAG_CODING_STATS: &str = "coding-stats";
pub const TAG_IMAGE_METADATA: &str = "image-metadata";

/// Tuning for the activity service
#[derive(Debug, Clone)]
pub struct ActivityServiceConfig {
    /// Lifetime of proxied upstream data before it turns stale
    pub proxy_ttl: Duration,
    /// Hard lifetime of image metadata
    pub metadata_ttl: Duration,
    /// Trailing window for recent commit counts
    pub commit_window_days: u32,
    pub commit_page_size: u32,
}

impl Default for ActivityServiceConfig {
    fn default() -> Self {
        Self {
            proxy_ttl: Duration::from_secs(1800),
            metadata_ttl: Duration::from_secs(3600),
            commit_window_days: 30,
            commit_page_size: 100,
        }
    }
}

impl ActivityServiceConfig {
    pub fn with_proxy_ttl(mut self, ttl: Duration) -> Self {
        self.proxy_ttl = ttl;
        self
    }

    pub fn with_metadata_ttl(mut self, ttl: Duration) -> Self {
        self.metadata_ttl = ttl;
        self
    }

    pub fn with_commit_window(mut self, days: u32, page_size: u32) -> Self {
        self.commit_window_days = days;
        self.commit_page_size = page_size;
        self
    }
}

/// Values held by the stale-while-revalidate store
#[derive(Debug, Clone)]
pub enum ProxyPayload {
    Profile(Profile),
    /// Public repositories keyed by the identifier they were requested with
    Repositories(BTreeMap<String, Repository>),
    CodingStats(CodingStat),
}

/// Upstream sources the service aggregates
#[derive(Debug, Clone)]
pub struct ActivitySources {
    pub github: Arc<dyn GitHubSource>,
    pub coding_stats: Arc<dyn CodingStatsSource>,
    pub images: Arc<dyn ImageMetadataSource>,
}

/// Fetches, validates, caches and merges developer activity data
#[derive(Debug)]
pub struct ActivityService {
    sources: ActivitySources,
    proxy_cache: CacheStore<ProxyPayload>,
    metadata_cache: CacheStore<ImageMetadata>,
    config: ActivityServiceConfig,
}

fn unexpected_payload(key: &str) -> DomainError {
    DomainError::internal(format!("Unexpected cached payload under '{}'", key))
}

/// Primary repository fetch plus a best-effort commit count
///
/// Both requests run concurrently. Only the primary result can fail the
/// call; a failed count becomes `None`.
async fn fetch_repository(
    github: &dyn GitHubSource,
    identifier: &str,
    window: &WindowQuery,
) -> Result<Repository, DomainError> {
    let (repository, commits) = futures::join!(
        github.repository(identifier),
        github.recent_commit_count(identifier, window)
    );

    let repository = repository.map_err(|e| match e {
        DomainError::Upstream { .. } => e,
        other => DomainError::upstream("github", format!("{}: {}", identifier, other)),
    })?;

    let recent_commit_count = match commits {
        Ok(count) => Some(count),
        Err(e) => {
            warn!(repository = identifier, error = %e, "Recent commit count unavailable");
            None
        }
    };

    Ok(repository.with_recent_commit_count(recent_commit_count))
}

impl ActivityService {
    pub fn new(
        sources: ActivitySources,
        proxy_cache: CacheStore<ProxyPayload>,
        metadata_cache: CacheStore<ImageMetadata>,
        config: ActivityServiceConfig,
    ) -> Self {
        Self {
            sources,
            proxy_cache,
            metadata_cache,
            config,
        }
    }

    pub fn config(&self) -> &ActivityServiceConfig {
        &self.config
    }

    pub fn metadata_cache(&self) -> &CacheStore<ImageMetadata> {
        &self.metadata_cache
    }

    /// Entries held across both stores
    pub fn cached_entries(&self) -> usize {
        self.proxy_cache.len() + self.metadata_cache.len()
    }

    pub fn coding_stats_provider(&self) -> &'static str {
        self.sources.coding_stats.provider_name()
    }

    /// Normalized profile for `handle`
    #[instrument(skip(self))]
    pub async fn fetch_profile(&self, handle: &str) -> Result<Profile, DomainError> {
        validate_handle(handle)?;

        let key = CacheKeyParams::new(handle).generate_with_namespace("github:profile");
        let github = self.sources.github.clone();
        let owned_handle = handle.to_string();

        let lookup = self
            .proxy_cache
            .get_or_fetch(
                &key,
                self.config.proxy_ttl,
                &[TAG_PROFILE, TAG_GITHUB],
                move || async move { github.user(&owned_handle).await.map(ProxyPayload::Profile) },
            )
            .await?;

        debug!(outcome = lookup.outcome.as_str(), "Profile lookup");

        match lookup.value() {
            ProxyPayload::Profile(profile) => Ok(profile.clone()),
            _ => Err(unexpected_payload(&key)),
        }
    }

    /// Public repositories for `identifiers`, in the order they were given
    ///
    /// The aggregate is cached under the sorted identifier set, so any
    /// permutation of the same list is served from one entry.
    #[instrument(skip(self), fields(count = identifiers.len()))]
    pub async fn fetch_repositories(
        &self,
        identifiers: &[String],
    ) -> Result<Vec<Repository>, DomainError> {
        let ordered = normalize_repository_list(identifiers.iter().map(String::as_str))?;

        let sorted: Vec<String> = ordered
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let key = CacheKeyParams::new(sorted.join(","))
            .with_component("days", self.config.commit_window_days.to_string())
            .generate_with_namespace("github:repos");

        let github = self.sources.github.clone();
        let days = self.config.commit_window_days;
        let page_size = self.config.commit_page_size;

        let lookup = self
            .proxy_cache
            .get_or_fetch(
                &key,
                self.config.proxy_ttl,
                &[TAG_REPOSITORIES, TAG_GITHUB],
                move || async move {
                    let window = WindowQuery::last_days(days, page_size, Utc::now());

                    let repositories = try_join_all(
                        sorted
                            .iter()
                            .map(|id| fetch_repository(github.as_ref(), id, &window)),
                    )
                    .await?;

                    let public = sorted
                        .into_iter()
                        .zip(repositories)
                        .filter(|(_, repository)| !repository.is_private)
                        .collect();

                    Ok(ProxyPayload::Repositories(public))
                },
            )
            .await?;

        debug!(outcome = lookup.outcome.as_str(), "Repositories lookup");

        match lookup.value() {
            ProxyPayload::Repositories(by_identifier) => Ok(ordered
                .iter()
                .filter_map(|id| by_identifier.get(id).cloned())
                .collect()),
            _ => Err(unexpected_payload(&key)),
        }
    }

    /// Top languages for `handle` over `range`
    #[instrument(skip(self))]
    pub async fn fetch_coding_stats(
        &self,
        handle: &str,
        range: StatsRange,
    ) -> Result<CodingStat, DomainError> {
        if handle.trim().is_empty() {
            return Err(DomainError::configuration("Coding stats username is not set"));
        }

        let provider = self.sources.coding_stats.provider_name();
        let key = CacheKeyParams::new(handle)
            .with_component("range", range.as_str())
            .generate_with_namespace(&format!("coding-stats:{}", provider));

        let source = self.sources.coding_stats.clone();
        let owned_handle = handle.to_string();

        let lookup = self
            .proxy_cache
            .get_or_fetch(
                &key,
                self.config.proxy_ttl,
                &[TAG_CODING_STATS, provider],
                move || async move {
                    source
                        .stats(&owned_handle, range)
                        .await
                        .map(ProxyPayload::CodingStats)
                },
            )
            .await?;

        debug!(outcome = lookup.outcome.as_str(), "Coding stats lookup");

        match lookup.value() {
            ProxyPayload::CodingStats(stat) => Ok(stat.clone()),
            _ => Err(unexpected_payload(&key)),
        }
    }

    /// Metadata for the image at `raw_path`, relative to the image root
    #[instrument(skip(self))]
    pub async fn fetch_image_metadata(&self, raw_path: &str) -> Result<ImageMetadata, DomainError> {
        let path = ImagePath::parse(raw_path)?;
        let key = CacheKeyParams::new(path.key()).generate_with_namespace("image:metadata");
        let images = self.sources.images.clone();

        let lookup = self
            .metadata_cache
            .get_or_fetch(
                &key,
                self.config.metadata_ttl,
                &[TAG_IMAGE_METADATA],
                move || async move { images.extract(&path).await },
            )
            .await?;

        debug!(outcome = lookup.outcome.as_str(), "Image metadata lookup");
        Ok(lookup.value().clone())
    }

    /// Drops every cached entry carrying `tag` from both stores
    #[instrument(skip(self))]
    pub async fn invalidate_tag(&self, tag: &str) -> usize {
        let removed = self.proxy_cache.invalidate_by_tag(tag).await
            + self.metadata_cache.invalidate_by_tag(tag).await;

        tracing::info!(tag, removed, "Cache tag invalidated");
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::coding_stats::mock::MockCodingStatsSource;
    use crate::domain::github::mock::{profile, repository, MockGitHubSource, COMMIT_TIMEOUT};
    use crate::domain::image::mock::MockImageMetadataSource;
    use crate::domain::CachePolicy;

    struct Fixture {
        github: Arc<MockGitHubSource>,
        coding_stats: Arc<MockCodingStatsSource>,
        images: Arc<MockImageMetadataSource>,
        service: ActivityService,
    }

    fn fixture_with(
        github: MockGitHubSource,
        coding_stats: MockCodingStatsSource,
        images: MockImageMetadataSource,
    ) -> Fixture {
        let github = Arc::new(github);
        let coding_stats = Arc::new(coding_stats);
        let images = Arc::new(images);

        let service = ActivityService::new(
            ActivitySources {
                github: github.clone(),
                coding_stats: coding_stats.clone(),
                images: images.clone(),
            },
            CacheStore::new("proxy", CachePolicy::StaleWhileRevalidate, 1_000),
            CacheStore::new("metadata", CachePolicy::StrictTtl, 1_000),
            ActivityServiceConfig::default(),
        );

        Fixture {
            github,
            coding_stats,
            images,
            service,
        }
    }

    fn github() -> MockGitHubSource {
        let mut private = repository("a/secret");
        private.is_private = true;

        MockGitHubSource::new()
            .with_profile(profile("octocat"))
            .with_repository(repository("a/x"))
            .with_repository(repository("a/y"))
            .with_repository(repository("a/z"))
            .with_repository(private)
            .with_commit_count("a/x", 12)
            .with_commit_count("a/z", 100)
            .with_commit_count("a/secret", 3)
    }

    fn fixture() -> Fixture {
        fixture_with(
            github(),
            MockCodingStatsSource::new(),
            MockImageMetadataSource::new(),
        )
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_profile_cached_within_ttl() {
        let f = fixture();

        let first = f.service.fetch_profile("octocat").await.unwrap();
        let second = f.service.fetch_profile("octocat").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(f.github.user_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_profile_requests_single_upstream_call() {
        let f = fixture_with(
            github().with_delay(Duration::from_millis(200)),
            MockCodingStatsSource::new(),
            MockImageMetadataSource::new(),
        );

        let results = futures::future::join_all(
            (0..10).map(|_| f.service.fetch_profile("octocat")),
        )
        .await;

        assert!(results.iter().all(Result::is_ok));
        assert_eq!(f.github.user_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_profile_served_then_refreshed() {
        let f = fixture();
        f.service.fetch_profile("octocat").await.unwrap();

        let mut renamed = profile("octocat");
        renamed.name = "Mona".to_string();
        f.github.set_profile(renamed);

        tokio::time::advance(Duration::from_secs(1801)).await;

        let stale = f.service.fetch_profile("octocat").await.unwrap();
        assert_eq!(stale.name, "octocat name");

        tokio::time::sleep(Duration::from_millis(10)).await;

        let refreshed = f.service.fetch_profile("octocat").await.unwrap();
        assert_eq!(refreshed.name, "Mona");
        assert_eq!(f.github.user_calls(), 2);
    }

    #[tokio::test]
    async fn test_profile_upstream_failure() {
        let f = fixture();

        let err = f.service.fetch_profile("ghost").await.unwrap_err();
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn test_repositories_preserve_order_and_drop_private() {
        let f = fixture();

        let repos = f
            .service
            .fetch_repositories(&ids(&["a/z", "a/secret", "a/x"]))
            .await
            .unwrap();

        let names: Vec<&str> = repos.iter().map(|r| r.full_name.as_str()).collect();
        assert_eq!(names, vec!["a/z", "a/x"]);
        assert!(repos.iter().all(|r| !r.is_private));
        assert_eq!(repos[0].recent_commit_count, Some(100));
        assert_eq!(repos[1].recent_commit_count, Some(12));
    }

    #[tokio::test]
    async fn test_failed_commit_count_becomes_null() {
        let f = fixture();

        let repos = f
            .service
            .fetch_repositories(&ids(&["a/x", "a/y"]))
            .await
            .unwrap();

        assert_eq!(repos.len(), 2);
        assert_eq!(repos[0].recent_commit_count, Some(12));
        assert_eq!(repos[1].full_name, "a/y");
        assert_eq!(repos[1].recent_commit_count, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_out_commit_count_becomes_null() {
        let f = fixture_with(
            github()
                .with_commit_count("a/y", 9)
                .with_commit_delay("a/y", Duration::from_secs(30)),
            MockCodingStatsSource::new(),
            MockImageMetadataSource::new(),
        );
        let started = tokio::time::Instant::now();

        let repos = f
            .service
            .fetch_repositories(&ids(&["a/x", "a/y"]))
            .await
            .unwrap();

        assert_eq!(repos.len(), 2);
        assert_eq!(repos[0].recent_commit_count, Some(12));
        assert_eq!(repos[1].full_name, "a/y");
        assert_eq!(repos[1].recent_commit_count, None);

        let elapsed = started.elapsed();
        assert!(elapsed >= COMMIT_TIMEOUT);
        assert!(elapsed < Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_too_many_repositories_makes_no_upstream_call() {
        let f = fixture();
        let list: Vec<String> = (0..31).map(|i| format!("a/r{}", i)).collect();

        let err = f.service.fetch_repositories(&list).await.unwrap_err();

        assert!(matches!(err, DomainError::BadRequest { .. }));
        assert_eq!(f.github.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_primary_failure_fails_whole_request() {
        let f = fixture_with(
            github().with_repository_error("a/y", "HTTP 500"),
            MockCodingStatsSource::new(),
            MockImageMetadataSource::new(),
        );

        let err = f
            .service
            .fetch_repositories(&ids(&["a/x", "a/y"]))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Upstream { .. }));
    }

    #[tokio::test]
    async fn test_empty_or_invalid_list_makes_no_upstream_call() {
        let f = fixture();

        let err = f.service.fetch_repositories(&ids(&["", "  "])).await.unwrap_err();
        assert!(matches!(err, DomainError::BadRequest { .. }));

        let err = f
            .service
            .fetch_repositories(&ids(&["a/x", "../etc"]))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::BadRequest { .. }));

        assert_eq!(f.github.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_permutations_share_cache_entry() {
        let f = fixture();

        f.service
            .fetch_repositories(&ids(&["a/x", "a/z"]))
            .await
            .unwrap();
        let calls = f.github.total_calls();

        let repos = f
            .service
            .fetch_repositories(&ids(&["a/z", "a/x", "a/z"]))
            .await
            .unwrap();

        let names: Vec<&str> = repos.iter().map(|r| r.full_name.as_str()).collect();
        assert_eq!(names, vec!["a/z", "a/x"]);
        assert_eq!(f.github.total_calls(), calls);
    }

    #[tokio::test]
    async fn test_coding_stats_cached_per_range() {
        let f = fixture();

        f.service
            .fetch_coding_stats("dev", StatsRange::Last7Days)
            .await
            .unwrap();
        f.service
            .fetch_coding_stats("dev", StatsRange::Last7Days)
            .await
            .unwrap();
        let yearly = f
            .service
            .fetch_coding_stats("dev", StatsRange::LastYear)
            .await
            .unwrap();

        assert_eq!(yearly.range, StatsRange::LastYear);
        assert_eq!(f.coding_stats.calls(), 2);
    }

    #[tokio::test]
    async fn test_coding_stats_failure_propagates() {
        let f = fixture_with(
            github(),
            MockCodingStatsSource::failing(),
            MockImageMetadataSource::new(),
        );

        let err = f
            .service
            .fetch_coding_stats("dev", StatsRange::Last7Days)
            .await
            .unwrap_err();
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn test_image_traversal_never_reaches_source() {
        let f = fixture();

        let err = f
            .service
            .fetch_image_metadata("../../etc/passwd")
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound { .. }));
        assert_eq!(f.images.calls(), 0);
    }

    #[tokio::test]
    async fn test_image_metadata_cached_by_normalized_path() {
        let f = fixture_with(
            github(),
            MockCodingStatsSource::new(),
            MockImageMetadataSource::new().with_image("photos/a.jpg", ImageMetadata::unknown()),
        );

        f.service.fetch_image_metadata("/photos/a.jpg").await.unwrap();
        f.service
            .fetch_image_metadata("photos/./a.jpg")
            .await
            .unwrap();

        assert_eq!(f.images.calls(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_tag_forces_refetch() {
        let f = fixture_with(
            github(),
            MockCodingStatsSource::new(),
            MockImageMetadataSource::new().with_image("a.jpg", ImageMetadata::unknown()),
        );

        f.service.fetch_profile("octocat").await.unwrap();
        f.service.fetch_repositories(&ids(&["a/x"])).await.unwrap();
        f.service
            .fetch_coding_stats("dev", StatsRange::Last7Days)
            .await
            .unwrap();
        f.service.fetch_image_metadata("a.jpg").await.unwrap();

        assert_eq!(f.service.invalidate_tag(TAG_GITHUB).await, 2);

        f.service.fetch_profile("octocat").await.unwrap();
        f.service
            .fetch_coding_stats("dev", StatsRange::Last7Days)
            .await
            .unwrap();

        assert_eq!(f.github.user_calls(), 2);
        assert_eq!(f.coding_stats.calls(), 1);

        assert_eq!(f.service.invalidate_tag(TAG_IMAGE_METADATA).await, 1);
    }
}
