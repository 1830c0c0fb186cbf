use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;

use super::observability::record_upstream_call;
use crate::domain::DomainError;

/// Trait for HTTP client operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    /// Issues a GET and decodes a JSON body; any non-2xx status, transport
    /// failure or timeout is an upstream error tagged with `source_name`
    async fn get_json(
        &self,
        source_name: &str,
        url: &str,
        headers: Vec<(&str, &str)>,
        query: &[(&str, String)],
    ) -> Result<Value, DomainError>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                DomainError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    async fn send(
        &self,
        source_name: &str,
        url: &str,
        headers: Vec<(&str, &str)>,
        query: &[(&str, String)],
    ) -> Result<Value, DomainError> {
        let mut request = self.client.get(url);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                DomainError::upstream(source_name, "Request timed out")
            } else {
                DomainError::upstream(
                    source_name,
                    format!("Request failed: {}", e.without_url()),
                )
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::upstream(
                source_name,
                format!("HTTP {}", status.as_u16()),
            ));
        }

        response.json().await.map_err(|e| {
            DomainError::upstream(
                source_name,
                format!("Failed to parse response: {}", e.without_url()),
            )
        })
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn get_json(
        &self,
        source_name: &str,
        url: &str,
        headers: Vec<(&str, &str)>,
        query: &[(&str, String)],
    ) -> Result<Value, DomainError> {
        let started = Instant::now();
        let result = self.send(source_name, url, headers, query).await;

        record_upstream_call(source_name, result.is_ok(), started.elapsed());

        if let Err(e) = &result {
            tracing::debug!(source = source_name, error = %e, "Upstream call failed");
        }

        result
    }
}
