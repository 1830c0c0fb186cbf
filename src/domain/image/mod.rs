//! Image domain - Photo metadata and root-relative paths

mod entity;
mod path;
mod source;

pub use entity::{
    ExifFields, ImageMetadata, UNKNOWN, UNKNOWN_CAMERA, UNKNOWN_LENS, UNKNOWN_LOCATION,
};
pub use path::ImagePath;
pub use source::ImageMetadataSource;

#[cfg(test)]
pub use source::mock;
