//! GitHub REST payloads and their schemas

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::domain::{Field, FieldType, Profile, Repository, Schema};

pub static USER_SCHEMA: Lazy<Schema<GitHubUser>> = Lazy::new(|| {
    Schema::new(
        "github.user",
        vec![
            Field::required("login", FieldType::String),
            Field::nullable("name", FieldType::String),
            Field::required("avatar_url", FieldType::String),
            Field::nullable("location", FieldType::String),
            Field::optional("public_repos", FieldType::Integer),
            Field::optional("followers", FieldType::Integer),
        ],
    )
});

pub static REPOSITORY_SCHEMA: Lazy<Schema<GitHubRepository>> = Lazy::new(|| {
    Schema::new(
        "github.repository",
        vec![
            Field::required("id", FieldType::Integer),
            Field::required("name", FieldType::String),
            Field::required("full_name", FieldType::String),
            Field::nullable("description", FieldType::String),
            Field::nullable("language", FieldType::String),
            Field::required("stargazers_count", FieldType::Integer),
            Field::required("forks_count", FieldType::Integer),
            Field::required("html_url", FieldType::String),
            Field::required("updated_at", FieldType::String),
            Field::optional("topics", FieldType::array_of(FieldType::String)),
            Field::optional("private", FieldType::Boolean),
        ],
    )
});

#[derive(Debug, Deserialize)]
pub struct GitHubUser {
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: String,
    pub location: Option<String>,
    #[serde(default)]
    pub public_repos: u64,
    #[serde(default)]
    pub followers: u64,
}

impl From<GitHubUser> for Profile {
    fn from(user: GitHubUser) -> Self {
        let name = user
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| user.login.clone());

        Self {
            name,
            handle: user.login,
            avatar_url: user.avatar_url,
            location: user.location.filter(|l| !l.trim().is_empty()),
            public_repo_count: user.public_repos,
            follower_count: user.followers,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GitHubRepository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub html_url: String,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub private: bool,
}

impl From<GitHubRepository> for Repository {
    fn from(repo: GitHubRepository) -> Self {
        Self {
            id: repo.id,
            name: repo.name,
            full_name: repo.full_name,
            description: repo.description,
            primary_language: repo.language,
            star_count: repo.stargazers_count,
            fork_count: repo.forks_count,
            url: repo.html_url,
            updated_at: repo.updated_at,
            topics: repo.topics,
            is_private: repo.private,
            recent_commit_count: None,
        }
    }
}

/// Commit lists are read leniently: an array counts its elements, anything
/// else counts as zero
pub fn count_commits(payload: &serde_json::Value) -> u32 {
    payload
        .as_array()
        .map(|commits| u32::try_from(commits.len()).unwrap_or(u32::MAX))
        .unwrap_or(0)
}
