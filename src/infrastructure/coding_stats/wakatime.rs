use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::types::{lenient_language, WAKATIME_SCHEMA};
use crate::domain::{CodingStat, CodingStatsSource, DomainError, StatsRange};
use crate::infrastructure::http_client::HttpClientTrait;

pub const DEFAULT_WAKATIME_BASE_URL: &str = "https://wakatime.com";
const SOURCE_NAME: &str = "wakatime";

/// Official WakaTime API authenticated with an API key
#[derive(Debug)]
pub struct WakatimeClient<C: HttpClientTrait> {
    client: C,
    base_url: String,
    auth_header: String,
}

impl<C: HttpClientTrait> WakatimeClient<C> {
    pub fn new(client: C, api_key: &str) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_WAKATIME_BASE_URL)
    }

    pub fn with_base_url(client: C, api_key: &str, base_url: impl Into<String>) -> Self {
        // WakaTime expects the bare key, base64-encoded, as the basic credential
        let auth_header = format!("Basic {}", STANDARD.encode(api_key.trim()));

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_header,
        }
    }

    fn stats_url(&self, handle: &str, range: StatsRange) -> String {
        format!("{}/api/v1/users/{}/stats/{}", self.base_url, handle, range)
    }
}

#[async_trait]
impl<C: HttpClientTrait> CodingStatsSource for WakatimeClient<C> {
    async fn stats(&self, handle: &str, range: StatsRange) -> Result<CodingStat, DomainError> {
        let payload = self
            .client
            .get_json(
                SOURCE_NAME,
                &self.stats_url(handle, range),
                vec![
                    ("Accept", "application/json"),
                    ("Authorization", self.auth_header.as_str()),
                ],
                &[],
            )
            .await?;

        let data = WAKATIME_SCHEMA.validate(&payload)?.data;

        let total = data
            .readable_total_including_other()
            .or_else(|| data.readable_total())
            .unwrap_or_default();

        let languages = data.languages.iter().map(lenient_language).collect();

        Ok(CodingStat::summarize(languages, total, range))
    }

    fn provider_name(&self) -> &'static str {
        SOURCE_NAME
    }
}
