//! Page-level types.

use super::{Annotation, PageImage};
use serde::{Deserialize, Serialize};

/// A single page in the document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Plain text of the page, trimmed
    pub text: String,

    /// Embedded images, numbered from 1
    pub images: Vec<PageImage>,

    /// Annotations attached to the page
    pub annotations: Vec<Annotation>,
}

impl Page {
    /// Create an empty page.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            ..Default::default()
        }
    }

    /// Create a page with the given text.
    pub fn with_text(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
            ..Default::default()
        }
    }

    /// Add an image; its index is the next free position on the page.
    pub fn add_image(&mut self, image: super::ImageData) {
        let index = self.images.len() + 1;
        self.images.push(PageImage { index, image });
    }

    /// Add an annotation.
    pub fn add_annotation(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    /// Check if the page carries no text, images or annotations.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.images.is_empty() && self.annotations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ImageData;

    #[test]
    fn test_page_new() {
        let page = Page::new(1);
        assert_eq!(page.number, 1);
        assert!(page.is_empty());
    }

    #[test]
    fn test_add_image_numbers_from_one() {
        let mut page = Page::new(4);
        page.add_image(ImageData::jpeg(vec![0xFF, 0xD8, 0xFF]));
        page.add_image(ImageData::jpeg(vec![0xFF, 0xD8, 0xFF]));

        let indices: Vec<_> = page.images.iter().map(|i| i.index).collect();
        assert_eq!(indices, vec![1, 2]);
        assert!(!page.is_empty());
    }

    #[test]
    fn test_whitespace_page_is_empty() {
        let page = Page::with_text(1, "  \n\t ");
        assert!(page.is_empty());
    }
}
