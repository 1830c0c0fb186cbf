use async_trait::async_trait;

use super::types::{count_commits, REPOSITORY_SCHEMA, USER_SCHEMA};
use crate::domain::{DomainError, GitHubSource, Profile, Repository, WindowQuery};
use crate::infrastructure::http_client::HttpClientTrait;

pub const DEFAULT_GITHUB_BASE_URL: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";
const SOURCE_NAME: &str = "github";

/// GitHub REST API source
#[derive(Debug)]
pub struct GitHubClient<C: HttpClientTrait> {
    client: C,
    base_url: String,
    auth_header: Option<String>,
}

impl<C: HttpClientTrait> GitHubClient<C> {
    pub fn new(client: C, base_url: impl Into<String>, token: Option<&str>) -> Self {
        let auth_header = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| format!("Bearer {}", t));

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_header,
        }
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        let mut headers = vec![
            ("Accept", "application/vnd.github+json"),
            ("X-GitHub-Api-Version", GITHUB_API_VERSION),
        ];

        if let Some(auth) = &self.auth_header {
            headers.push(("Authorization", auth.as_str()));
        }

        headers
    }

    async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, DomainError> {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .get_json(SOURCE_NAME, &url, self.headers(), query)
            .await
    }
}

#[async_trait]
impl<C: HttpClientTrait> GitHubSource for GitHubClient<C> {
    async fn user(&self, handle: &str) -> Result<Profile, DomainError> {
        let payload = self.get(&format!("/users/{}", handle), &[]).await?;
        let user = USER_SCHEMA.validate(&payload)?;

        Ok(user.into())
    }

    async fn repository(&self, full_name: &str) -> Result<Repository, DomainError> {
        let payload = self.get(&format!("/repos/{}", full_name), &[]).await?;
        let repository = REPOSITORY_SCHEMA.validate(&payload)?;

        Ok(repository.into())
    }

    async fn recent_commit_count(
        &self,
        full_name: &str,
        window: &WindowQuery,
    ) -> Result<u32, DomainError> {
        let query = [
            ("since", window.since_param()),
            ("per_page", window.page_size.to_string()),
        ];

        let payload = self
            .get(&format!("/repos/{}/commits", full_name), &query)
            .await?;

        Ok(count_commits(&payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http_client::mock::MockHttpClient;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    const BASE: &str = "https://api.test";

    fn user_payload() -> serde_json::Value {
        json!({
            "login": "octocat",
            "name": null,
            "avatar_url": "https://avatars.test/octocat",
            "location": null,
            "public_repos": 3,
            "followers": 5
        })
    }

    #[tokio::test]
    async fn test_user_sends_github_headers() {
        let mock = MockHttpClient::new().with_response(format!("{}/users/octocat", BASE), user_payload());
        let client = GitHubClient::new(mock, BASE, Some("ghp_secret"));

        let profile = client.user("octocat").await.unwrap();
        assert_eq!(profile.name, "octocat");

        let request = &client.client.requests()[0];
        assert_eq!(request.header("Accept"), Some("application/vnd.github+json"));
        assert_eq!(request.header("X-GitHub-Api-Version"), Some(GITHUB_API_VERSION));
        assert_eq!(request.header("Authorization"), Some("Bearer ghp_secret"));
    }

    #[tokio::test]
    async fn test_no_token_means_no_authorization_header() {
        let mock = MockHttpClient::new().with_response(format!("{}/users/octocat", BASE), user_payload());
        let client = GitHubClient::new(mock, format!("{}/", BASE), Some("  "));

        client.user("octocat").await.unwrap();

        assert_eq!(client.client.requests()[0].header("Authorization"), None);
    }

    #[tokio::test]
    async fn test_invalid_user_payload_is_validation_error() {
        let mock = MockHttpClient::new()
            .with_response(format!("{}/users/octocat", BASE), json!({"login": 7}));
        let client = GitHubClient::new(mock, BASE, None);

        let err = client.user("octocat").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_commit_count_uses_window() {
        let url = format!("{}/repos/a/x/commits", BASE);
        let mock = MockHttpClient::new().with_response(url, json!([{"sha": "1"}, {"sha": "2"}]));
        let client = GitHubClient::new(mock, BASE, None);

        let now = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();
        let window = WindowQuery::last_days(30, 100, now);

        assert_eq!(client.recent_commit_count("a/x", &window).await.unwrap(), 2);

        let request = &client.client.requests()[0];
        assert_eq!(request.query_param("since"), Some("2024-03-01T12:00:00.000Z"));
        assert_eq!(request.query_param("per_page"), Some("100"));
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let mock = MockHttpClient::new().with_error(format!("{}/repos/a/x", BASE), "HTTP 404");
        let client = GitHubClient::new(mock, BASE, None);

        let err = client.repository("a/x").await.unwrap_err();
        assert!(matches!(err, DomainError::Upstream { .. }));
    }
}
