//! Domain layer - Core entities, validation and source contracts

pub mod cache;
pub mod coding_stats;
pub mod error;
pub mod github;
pub mod image;
pub mod schema;
pub mod window;

pub use cache::{CacheEntry, CacheKeyParams, CachePolicy, EntryState, LookupOutcome};
pub use coding_stats::{CodingStat, CodingStatsSource, LanguageShare, StatsRange};
pub use error::DomainError;
pub use github::{GitHubSource, Profile, Repository};
pub use image::{ExifFields, ImageMetadata, ImageMetadataSource, ImagePath};
pub use schema::{validate, Field, FieldType, Presence, Schema};
pub use window::{window_since, WindowQuery};
