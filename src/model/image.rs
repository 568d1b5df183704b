//! Embedded image types.

use serde::{Deserialize, Serialize};

/// An image placed on a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageImage {
    /// Position of the image on its page (1-indexed)
    pub index: usize,

    /// Image bytes and properties
    pub image: ImageData,
}

impl PageImage {
    /// File name used when the image is written next to the report,
    /// e.g. `page_3_img_1.jpeg`.
    pub fn file_name(&self, page_number: u32) -> String {
        format!(
            "page_{}_img_{}.{}",
            page_number,
            self.index,
            self.image.extension()
        )
    }

    /// File name of the remote analysis written for this image.
    pub fn analysis_file_name(&self, page_number: u32) -> String {
        format!("page_{}_img_{}_analysis.txt", page_number, self.index)
    }
}

/// Raw image data as stored in the PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageData {
    /// Raw binary data
    #[serde(skip_serializing, default)]
    pub data: Vec<u8>,

    /// MIME type (e.g., "image/jpeg")
    pub mime_type: String,

    /// Width in pixels
    pub width: Option<u32>,

    /// Height in pixels
    pub height: Option<u32>,

    /// Color space (e.g., "DeviceRGB")
    pub color_space: Option<String>,

    /// Bits per component (e.g., 8)
    pub bits_per_component: Option<u8>,
}

impl ImageData {
    /// Create image data with the given MIME type.
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
            width: None,
            height: None,
            color_space: None,
            bits_per_component: None,
        }
    }

    /// Create a JPEG image.
    pub fn jpeg(data: Vec<u8>) -> Self {
        Self::new(data, "image/jpeg")
    }

    /// Set image dimensions.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Set color space.
    pub fn with_color_space(mut self, color_space: impl Into<String>) -> Self {
        self.color_space = Some(color_space.into());
        self
    }

    /// Set bits per component.
    pub fn with_bits_per_component(mut self, bits: u8) -> Self {
        self.bits_per_component = Some(bits);
        self
    }

    /// Size of the image data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// File extension for the stored format.
    ///
    /// Images are never transcoded, so undecoded pixel data is written
    /// with a `.raw` extension.
    pub fn extension(&self) -> &str {
        match self.mime_type.as_str() {
            "image/jpeg" => "jpeg",
            "image/png" => "png",
            "image/jp2" => "jpx",
            "image/tiff" => "tiff",
            _ => "raw",
        }
    }

    /// Detect a MIME type from magic bytes.
    pub fn sniff_mime_type(data: &[u8]) -> Option<&'static str> {
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some("image/jpeg")
        } else if data.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some("image/png")
        } else if data.starts_with(&[0x00, 0x00, 0x00, 0x0C, b'j', b'P', b' ', b' ']) {
            Some("image/jp2")
        } else if data.starts_with(b"II*\0") || data.starts_with(b"MM\0*") {
            Some("image/tiff")
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        let image = PageImage {
            index: 2,
            image: ImageData::jpeg(vec![0xFF, 0xD8, 0xFF]),
        };
        assert_eq!(image.file_name(7), "page_7_img_2.jpeg");
        assert_eq!(image.analysis_file_name(7), "page_7_img_2_analysis.txt");
    }

    #[test]
    fn test_extension_fallback() {
        let raw = ImageData::new(vec![1, 2, 3], "application/octet-stream");
        assert_eq!(raw.extension(), "raw");
    }

    #[test]
    fn test_sniff_mime_type() {
        assert_eq!(
            ImageData::sniff_mime_type(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some("image/jpeg")
        );
        assert_eq!(
            ImageData::sniff_mime_type(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
            Some("image/png")
        );
        assert_eq!(ImageData::sniff_mime_type(&[0, 0, 0, 0]), None);
    }
}
