//! GitHub data source trait

use std::fmt::Debug;

use async_trait::async_trait;

use super::entity::{Profile, Repository};
use crate::domain::window::WindowQuery;
use crate::domain::DomainError;

/// Upstream access to GitHub profile, repository and commit data
#[async_trait]
pub trait GitHubSource: Send + Sync + Debug {
    /// Fetches and normalizes a user profile
    async fn user(&self, handle: &str) -> Result<Profile, DomainError>;

    /// Fetches repository metadata; `recent_commit_count` is left unset
    async fn repository(&self, full_name: &str) -> Result<Repository, DomainError>;

    /// Counts commits inside the window, saturating at the window's page size
    async fn recent_commit_count(
        &self,
        full_name: &str,
        window: &WindowQuery,
    ) -> Result<u32, DomainError>;
}
