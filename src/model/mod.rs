//! Document model types.
//!
//! The model is what the parser hands to the extraction pipeline: one
//! entry per page carrying its plain text, its embedded images and its
//! annotations, plus document-level metadata.

mod annotation;
mod document;
mod image;
mod page;

pub use annotation::{Annotation, LevelLine};
pub use document::{Document, Metadata};
pub use image::{ImageData, PageImage};
pub use page::Page;
