//! Local image library and EXIF extraction

mod tags;
mod library;

pub use library::ImageLibrary;
