use async_trait::async_trait;

use super::types::WAKAPI_SCHEMA;
use crate::domain::{CodingStat, CodingStatsSource, DomainError, LanguageShare, StatsRange};
use crate::infrastructure::http_client::HttpClientTrait;

pub const DEFAULT_WAKAPI_BASE_URL: &str = "https://wakapi.dev";
const SOURCE_NAME: &str = "wakapi";

/// Public Wakapi instance; statistics are world-readable so no key is sent
#[derive(Debug)]
pub struct WakapiClient<C: HttpClientTrait> {
    client: C,
    base_url: String,
}

impl<C: HttpClientTrait> WakapiClient<C> {
    pub fn new(client: C) -> Self {
        Self::with_base_url(client, DEFAULT_WAKAPI_BASE_URL)
    }

    pub fn with_base_url(client: C, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn stats_url(&self, handle: &str, range: StatsRange) -> String {
        format!("{}/api/v1/users/{}/stats/{}", self.base_url, handle, range)
    }
}

#[async_trait]
impl<C: HttpClientTrait> CodingStatsSource for WakapiClient<C> {
    async fn stats(&self, handle: &str, range: StatsRange) -> Result<CodingStat, DomainError> {
        let payload = self
            .client
            .get_json(
                SOURCE_NAME,
                &self.stats_url(handle, range),
                vec![("Accept", "application/json")],
                &[],
            )
            .await?;

        let data = WAKAPI_SCHEMA.validate(&payload)?.data;

        let total = data
            .readable_total()
            .or_else(|| data.readable_total_including_other())
            .unwrap_or_default();

        let languages = data.languages.into_iter().map(LanguageShare::from).collect();

        Ok(CodingStat::summarize(languages, total, range))
    }

    fn provider_name(&self) -> &'static str {
        SOURCE_NAME
    }
}
