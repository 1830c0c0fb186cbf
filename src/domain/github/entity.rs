//! GitHub profile and repository entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalized public identity of a GitHub user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(rename = "username")]
    pub handle: String,
    #[serde(rename = "avatar")]
    pub avatar_url: String,
    pub location: Option<String>,
    #[serde(rename = "publicRepos")]
    pub public_repo_count: u64,
    #[serde(rename = "followers")]
    pub follower_count: u64,
}

/// Public repository summary
///
/// `recent_commit_count` is filled by an independent best-effort sub-fetch;
/// `None` means the count could not be obtained, not that there were no commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub primary_language: Option<String>,
    pub star_count: u64,
    pub fork_count: u64,
    pub url: String,
    pub updated_at: DateTime<Utc>,
    pub topics: Vec<String>,
    pub is_private: bool,
    pub recent_commit_count: Option<u32>,
}

impl Repository {
    pub fn with_recent_commit_count(mut self, count: Option<u32>) -> Self {
        self.recent_commit_count = count;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn repository() -> Repository {
        Repository {
            id: 1,
            name: "x".to_string(),
            full_name: "a/x".to_string(),
            description: None,
            primary_language: Some("Rust".to_string()),
            star_count: 3,
            fork_count: 0,
            url: "https://github.com/a/x".to_string(),
            updated_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            topics: vec!["cli".to_string()],
            is_private: false,
            recent_commit_count: None,
        }
    }

    #[test]
    fn test_profile_wire_names() {
        let profile = Profile {
            name: "The Octocat".to_string(),
            handle: "octocat".to_string(),
            avatar_url: "https://avatars.example/1".to_string(),
            location: None,
            public_repo_count: 8,
            follower_count: 100,
        };

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["username"], "octocat");
        assert_eq!(json["avatar"], "https://avatars.example/1");
        assert_eq!(json["publicRepos"], 8);
        assert_eq!(json["followers"], 100);
        assert!(json["location"].is_null());
    }

    #[test]
    fn test_repository_serializes_null_commit_count() {
        let json = serde_json::to_value(repository()).unwrap();

        assert_eq!(json["fullName"], "a/x");
        assert_eq!(json["starCount"], 3);
        assert_eq!(json["updatedAt"], "2024-01-02T03:04:05Z");
        assert!(json["recentCommitCount"].is_null());
    }

    #[test]
    fn test_with_recent_commit_count() {
        let repo = repository().with_recent_commit_count(Some(12));
        assert_eq!(repo.recent_commit_count, Some(12));
    }
}
