use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::domain::DomainError;

/// Image path relative to the configured image root
///
/// Parsing is purely lexical: `.` segments are dropped and `..` may only
/// pop segments already pushed. A path that would climb above the root is
/// reported as not found so callers cannot probe the filesystem layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImagePath(PathBuf);

impl ImagePath {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(DomainError::bad_request("Missing path parameter"));
        }

        if trimmed.contains('\0') {
            return Err(DomainError::bad_request("Invalid path parameter"));
        }

        let relative = trimmed.trim_start_matches(['/', '\\']);
        let mut normalized = PathBuf::new();

        for component in Path::new(relative).components() {
            match component {
                Component::Normal(segment) => normalized.push(segment),
                Component::CurDir => {}
                Component::ParentDir => {
                    if !normalized.pop() {
                        return Err(DomainError::not_found("Image not found"));
                    }
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(DomainError::bad_request("Invalid path parameter"));
                }
            }
        }

        if normalized.as_os_str().is_empty() {
            return Err(DomainError::bad_request("Invalid path parameter"));
        }

        Ok(Self(normalized))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Cache key form with forward slashes
    pub fn key(&self) -> String {
        self.0
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl fmt::Display for ImagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}
