//! One extractor per modality.

mod document;
mod image;
mod media;

pub use document::DocumentExtractor;
pub use image::ImageExtractor;
pub use media::MediaExtractor;
