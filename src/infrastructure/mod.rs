//! Infrastructure layer - External service implementations

pub mod cache;
pub mod coding_stats;
pub mod github;
pub mod http_client;
pub mod image;
pub mod logging;
pub mod observability;
pub mod services;
