use std::sync::Arc;

use super::{WakapiClient, WakatimeClient};
use crate::config::{CodingStatsConfig, CodingStatsProvider};
use crate::domain::{CodingStatsSource, DomainError};
use crate::infrastructure::http_client::HttpClient;

/// Factory for the configured coding statistics upstream
#[derive(Debug)]
pub struct CodingStatsSourceFactory;

impl CodingStatsSourceFactory {
    pub fn create(
        config: &CodingStatsConfig,
        http_client: HttpClient,
    ) -> Result<Arc<dyn CodingStatsSource>, DomainError> {
        match config.provider {
            CodingStatsProvider::Wakapi => {
                let source = match &config.base_url {
                    Some(base_url) => WakapiClient::with_base_url(http_client, base_url),
                    None => WakapiClient::new(http_client),
                };
                Ok(Arc::new(source))
            }

            CodingStatsProvider::Wakatime => {
                let has_username = config
                    .username
                    .as_deref()
                    .is_some_and(|u| !u.trim().is_empty());

                let api_key = config
                    .api_key
                    .as_deref()
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .filter(|_| has_username)
                    .ok_or_else(|| {
                        DomainError::configuration(
                            "Missing WakaTime configuration: WAKATIME_USERNAME and WAKATIME_API_KEY are required",
                        )
                    })?;

                let source = match &config.base_url {
                    Some(base_url) => WakatimeClient::with_base_url(http_client, api_key, base_url),
                    None => WakatimeClient::new(http_client, api_key),
                };
                Ok(Arc::new(source))
            }
        }
    }
}
