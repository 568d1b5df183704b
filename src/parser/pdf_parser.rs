//! PDF document reader using lopdf.

use std::io::Read;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::detect::{detect_header, detect_header_from_path};
use crate::error::{Error, Result};
use crate::model::{Annotation, Document, ImageData, Metadata, Page};

use super::options::{ErrorMode, ParseOptions};

/// PDF document reader.
pub struct PdfParser {
    doc: LopdfDocument,
    options: ParseOptions,
}

impl PdfParser {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        detect_header_from_path(path)?;
        let doc = LopdfDocument::load(path)?;
        Ok(Self { doc, options })
    }

    /// Read a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Read a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        detect_header(data)?;
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self { doc, options })
    }

    /// Read a PDF from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Read metadata and every selected page.
    pub fn parse(&self) -> Result<Document> {
        let mut document = Document::new();
        document.metadata = self.extract_metadata();

        let page_ids = self.doc.get_pages();
        document.metadata.page_count = page_ids.len() as u32;

        for (&page_num, &page_id) in page_ids.iter() {
            if !self.options.pages.includes(page_num) {
                continue;
            }
            document.add_page(self.parse_page(page_num, page_id)?);
        }

        log::debug!(
            "Parsed {} of {} pages",
            document.page_count(),
            document.metadata.page_count
        );

        Ok(document)
    }

    /// Get the number of pages in the file.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Read the text of one page, trimmed.
    pub fn page_text(&self, page_num: u32) -> Result<String> {
        let total = self.page_count();
        if page_num == 0 || page_num > total {
            return Err(Error::PageOutOfRange(page_num, total));
        }
        self.doc
            .extract_text(&[page_num])
            .map(|text| text.trim().to_string())
            .map_err(|e| Error::TextExtract(format!("Page {}: {}", page_num, e)))
    }

    fn parse_page(&self, page_num: u32, page_id: ObjectId) -> Result<Page> {
        let mut page = Page::new(page_num);

        match self.page_text(page_num) {
            Ok(text) => page.text = text,
            Err(e) => {
                if self.options.error_mode == ErrorMode::Strict {
                    return Err(e);
                }
                log::warn!("Failed to extract text from page {}: {}", page_num, e);
            }
        }

        if self.options.extract_images {
            for image in self.page_images(page_id) {
                page.add_image(image);
            }
        }

        if self.options.extract_annotations {
            for annotation in self.page_annotations(page_num, page_id) {
                page.add_annotation(annotation);
            }
        }

        Ok(page)
    }

    fn extract_metadata(&self) -> Metadata {
        let mut metadata = Metadata::with_version(self.doc.version.to_string());
        metadata.encrypted = self.doc.is_encrypted();

        let info = self
            .doc
            .trailer
            .get(b"Info")
            .ok()
            .and_then(|obj| self.resolve_dict(obj));

        if let Some(info) = info {
            metadata.title = get_string_from_dict(info, b"Title");
            metadata.author = get_string_from_dict(info, b"Author");
            metadata.subject = get_string_from_dict(info, b"Subject");
            metadata.keywords = get_string_from_dict(info, b"Keywords");
            metadata.creator = get_string_from_dict(info, b"Creator");
            metadata.producer = get_string_from_dict(info, b"Producer");
            metadata.created =
                get_string_from_dict(info, b"CreationDate").and_then(|d| parse_pdf_date(&d));
            metadata.modified =
                get_string_from_dict(info, b"ModDate").and_then(|d| parse_pdf_date(&d));
        }

        metadata
    }

    /// Follow a reference, if any.
    fn resolve<'a>(&'a self, obj: &'a Object) -> Option<&'a Object> {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).ok(),
            other => Some(other),
        }
    }

    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        match self.resolve(obj)? {
            Object::Dictionary(dict) => Some(dict),
            Object::Stream(stream) => Some(&stream.dict),
            _ => None,
        }
    }

    /// Image XObjects of a page, in resource dictionary order.
    fn page_images(&self, page_id: ObjectId) -> Vec<ImageData> {
        let xobjects = self
            .doc
            .get_dictionary(page_id)
            .ok()
            .and_then(|page| page.get(b"Resources").ok())
            .and_then(|res| self.resolve_dict(res))
            .and_then(|res| res.get(b"XObject").ok())
            .and_then(|xobj| self.resolve_dict(xobj));

        let Some(xobjects) = xobjects else {
            return Vec::new();
        };

        xobjects
            .iter()
            .filter_map(|(name, obj)| {
                let id = obj.as_reference().ok()?;
                match self.extract_image(id) {
                    Ok(image) => image,
                    Err(e) => {
                        log::warn!(
                            "Skipping XObject {}: {}",
                            String::from_utf8_lossy(name),
                            e
                        );
                        None
                    }
                }
            })
            .collect()
    }

    /// Read an image XObject; `Ok(None)` for non-image XObjects.
    fn extract_image(&self, id: ObjectId) -> Result<Option<ImageData>> {
        let stream = match self.doc.get_object(id)? {
            Object::Stream(stream) => stream,
            _ => return Err(Error::ImageExtract("XObject is not a stream".to_string())),
        };
        let dict = &stream.dict;

        match dict.get(b"Subtype").and_then(|s| s.as_name_str()) {
            Ok("Image") => {}
            _ => return Ok(None),
        }

        let filter = match dict.get(b"Filter") {
            Ok(Object::Name(name)) => String::from_utf8_lossy(name).into_owned(),
            Ok(Object::Array(filters)) => filters
                .last()
                .and_then(|f| f.as_name_str().ok())
                .unwrap_or_default()
                .to_string(),
            _ => String::new(),
        };

        // Encoded formats are written as stored; anything else is inflated
        // when possible and kept as raw samples.
        let mut image = match filter.as_str() {
            "DCTDecode" => ImageData::jpeg(stream.content.clone()),
            "JPXDecode" => ImageData::new(stream.content.clone(), "image/jp2"),
            _ => {
                let data = stream
                    .decompressed_content()
                    .unwrap_or_else(|_| stream.content.clone());
                let mime = ImageData::sniff_mime_type(&data).unwrap_or("application/octet-stream");
                ImageData::new(data, mime)
            }
        };

        let int = |key: &[u8]| dict.get(key).ok().and_then(|v| v.as_i64().ok());
        if let (Some(w), Some(h)) = (int(b"Width"), int(b"Height")) {
            image = image.with_dimensions(w as u32, h as u32);
        }
        if let Some(bits) = int(b"BitsPerComponent") {
            image = image.with_bits_per_component(bits as u8);
        }

        let color_space = dict.get(b"ColorSpace").ok().and_then(|cs| match cs {
            Object::Name(n) => Some(String::from_utf8_lossy(n).into_owned()),
            Object::Array(arr) => arr
                .first()
                .and_then(|o| o.as_name_str().ok())
                .map(String::from),
            _ => None,
        });
        if let Some(cs) = color_space {
            image = image.with_color_space(cs);
        }

        Ok(Some(image))
    }

    /// Annotations listed in the page's `Annots` array.
    fn page_annotations(&self, page_num: u32, page_id: ObjectId) -> Vec<Annotation> {
        let annots = self
            .doc
            .get_dictionary(page_id)
            .ok()
            .and_then(|page| page.get(b"Annots").ok())
            .and_then(|a| self.resolve(a))
            .and_then(|a| a.as_array().ok());

        let Some(annots) = annots else {
            return Vec::new();
        };

        annots
            .iter()
            .filter_map(|a| self.resolve_dict(a))
            .map(|dict| {
                let annotation_type = dict
                    .get(b"Subtype")
                    .ok()
                    .and_then(|s| s.as_name_str().ok())
                    .map(String::from);
                let content = get_string_from_dict(dict, b"Contents").unwrap_or_default();
                Annotation::new(page_num, annotation_type, content)
            })
            .collect()
    }
}

/// Decode a PDF text string: UTF-16BE with BOM, else UTF-8, else Latin-1.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let utf16: Vec<u16> = rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Helper to get a string from a PDF dictionary.
fn get_string_from_dict(dict: &Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    }
}

/// Parse a PDF date string (D:YYYYMMDDHHmmSSOHH'mm').
fn parse_pdf_date(s: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    let s = s.strip_prefix("D:").unwrap_or(s);

    let year: i32 = s.get(0..4)?.parse().ok()?;
    let field = |range: std::ops::Range<usize>, default: u32| -> u32 {
        s.get(range).and_then(|v| v.parse().ok()).unwrap_or(default)
    };

    chrono::NaiveDate::from_ymd_opt(year, field(4..6, 1), field(6..8, 1))
        .and_then(|date| date.and_hms_opt(field(8..10, 0), field(10..12, 0), field(12..14, 0)))
        .map(|dt| chrono::DateTime::from_naive_utc_and_offset(dt, chrono::Utc))
}
