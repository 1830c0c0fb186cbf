use std::fmt::Debug;

use async_trait::async_trait;

use super::entity::{CodingStat, StatsRange};
use crate::domain::DomainError;

/// Upstream provider of coding time statistics
#[async_trait]
pub trait CodingStatsSource: Send + Sync + Debug {
    /// Fetches a summary for `handle` over `range`, already sorted and truncated
    async fn stats(&self, handle: &str, range: StatsRange) -> Result<CodingStat, DomainError>;

    /// Stable provider name used in cache keys, tags and logs
    fn provider_name(&self) -> &'static str;
}
