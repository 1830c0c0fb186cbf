use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::tags::read_exif_fields;
use crate::domain::{DomainError, ImageMetadata, ImageMetadataSource, ImagePath};

/// Image files served from a single directory tree
#[derive(Debug, Clone)]
pub struct ImageLibrary {
    root: PathBuf,
}

impl ImageLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `path` to an existing regular file that is still inside the
    /// root after symlinks are followed
    fn resolve(root: &Path, path: &Path) -> Result<PathBuf, DomainError> {
        let not_found = || DomainError::not_found("Image not found");

        let root = root.canonicalize().map_err(|_| not_found())?;
        let candidate = root.join(path).canonicalize().map_err(|_| not_found())?;

        if !candidate.starts_with(&root) || !candidate.is_file() {
            return Err(not_found());
        }

        Ok(candidate)
    }
}

#[async_trait]
impl ImageMetadataSource for ImageLibrary {
    async fn extract(&self, path: &ImagePath) -> Result<ImageMetadata, DomainError> {
        let root = self.root.clone();
        let relative = path.as_path().to_path_buf();

        tokio::task::spawn_blocking(move || {
            let file = Self::resolve(&root, &relative)?;
            read_exif_fields(&file).map(ImageMetadata::from)
        })
        .await
        .map_err(|e| DomainError::internal(format!("Metadata extraction task failed: {}", e)))?
    }
}
