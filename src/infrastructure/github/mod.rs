//! GitHub REST API source

mod client;
mod types;

pub use client::{GitHubClient, DEFAULT_GITHUB_BASE_URL};
