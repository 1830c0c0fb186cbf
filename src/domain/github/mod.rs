//! GitHub domain - Profile and repository entities and their source

mod entity;
mod source;
mod validation;

pub use entity::{Profile, Repository};
pub use source::GitHubSource;
pub use validation::{
    normalize_repository_list, parse_repository_list, validate_handle,
    validate_repository_identifier, MAX_HANDLE_LENGTH, MAX_REPOSITORIES_PER_REQUEST,
};

#[cfg(test)]
pub use source::mock;
