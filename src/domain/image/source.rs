use std::fmt::Debug;

use async_trait::async_trait;

use super::entity::ImageMetadata;
use super::path::ImagePath;
use crate::domain::DomainError;

/// Reads photo metadata for images under a fixed root
#[async_trait]
pub trait ImageMetadataSource: Send + Sync + Debug {
    /// Extracts metadata for `path`; a file that does not exist under the
    /// root is `NotFound`, an unreadable or corrupt file is `Internal`
    async fn extract(&self, path: &ImagePath) -> Result<ImageMetadata, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::RwLock;

    #[derive(Debug, Default)]
    pub struct MockImageMetadataSource {
        images: RwLock<HashMap<String, Result<ImageMetadata, DomainError>>>,
        calls: AtomicUsize,
    }

    impl MockImageMetadataSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_image(self, key: impl Into<String>, metadata: ImageMetadata) -> Self {
            self.images.write().unwrap().insert(key.into(), Ok(metadata));
            self
        }

        pub fn with_error(self, key: impl Into<String>, error: DomainError) -> Self {
            self.images.write().unwrap().insert(key.into(), Err(error));
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ImageMetadataSource for MockImageMetadataSource {
        async fn extract(&self, path: &ImagePath) -> Result<ImageMetadata, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            self.images
                .read()
                .unwrap()
                .get(&path.key())
                .cloned()
                .unwrap_or_else(|| Err(DomainError::not_found("Image not found")))
        }
    }
}
