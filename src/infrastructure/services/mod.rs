//! Infrastructure services

mod activity_service;

pub use activity_service::{
    ActivityService, ActivityServiceConfig, ActivitySources, ProxyPayload, TAG_CODING_STATS,
    TAG_GITHUB, TAG_IMAGE_METADATA, TAG_PROFILE, TAG_REPOSITORIES,
};
