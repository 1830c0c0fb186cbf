//! GitHub identifier validation

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::DomainError;

/// Maximum length GitHub allows for a login
pub const MAX_HANDLE_LENGTH: usize = 39;

/// Maximum number of repositories accepted in one aggregate request
pub const MAX_REPOSITORIES_PER_REQUEST: usize = 30;

static HANDLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?$").unwrap());

static REPOSITORY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+$").unwrap());

/// Validate a GitHub login
pub fn validate_handle(handle: &str) -> Result<(), DomainError> {
    if handle.is_empty() || handle.len() > MAX_HANDLE_LENGTH || !HANDLE_PATTERN.is_match(handle) {
        return Err(DomainError::bad_request(format!(
            "Invalid GitHub handle '{}'",
            handle
        )));
    }

    Ok(())
}

/// Validate an `owner/name` repository identifier
pub fn validate_repository_identifier(identifier: &str) -> Result<(), DomainError> {
    let dot_segment = identifier
        .split('/')
        .any(|segment| segment == "." || segment == "..");

    if dot_segment || !REPOSITORY_PATTERN.is_match(identifier) {
        return Err(DomainError::bad_request(format!(
            "Invalid repository identifier '{}': expected owner/name",
            identifier
        )));
    }

    Ok(())
}

/// Parses a comma separated `repos` parameter
pub fn parse_repository_list(raw: &str) -> Result<Vec<String>, DomainError> {
    normalize_repository_list(raw.split(','))
}

/// Normalizes a list of repository identifiers
///
/// Entries are trimmed, blanks dropped and duplicates collapsed keeping the
/// first occurrence, so the caller's order is preserved. Every entry must be
/// a valid identifier, and the result must hold between one and
/// [`MAX_REPOSITORIES_PER_REQUEST`] entries.
pub fn normalize_repository_list<'a>(
    identifiers: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<String>, DomainError> {
    let mut unique: Vec<String> = Vec::new();

    for identifier in identifiers.into_iter().map(str::trim).filter(|id| !id.is_empty()) {
        validate_repository_identifier(identifier)?;

        if !unique.iter().any(|existing| existing == identifier) {
            unique.push(identifier.to_string());
        }
    }

    if unique.is_empty() {
        return Err(DomainError::bad_request("Missing repos parameter"));
    }

    if unique.len() > MAX_REPOSITORIES_PER_REQUEST {
        return Err(DomainError::bad_request(format!(
            "Too many repositories: {} (max {})",
            unique.len(),
            MAX_REPOSITORIES_PER_REQUEST
        )));
    }

    Ok(unique)
}
