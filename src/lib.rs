//! # pdfmeasure
//!
//! Measurement extraction and classification for PDF drawings and reports.
//!
//! Every page of a document is read as text and scanned for numeric
//! literals tagged with a unit ("sq m", "mm", "m"). Untagged numbers are
//! kept too: implausibly large ones are assumed to be millimetres and the
//! rest are flagged for confirmation. The result is a typed record per
//! value, per-page totals and a consolidated workbook.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfmeasure::{extract_file, ReportWriter};
//!
//! fn main() -> pdfmeasure::Result<()> {
//!     let report = extract_file("plan.pdf")?;
//!     for totals in &report.summary {
//!         println!("{}", totals.summary_line());
//!     }
//!
//!     ReportWriter::new("output").write("plan.pdf".as_ref(), &report)?;
//!     Ok(())
//! }
//! ```
//!
//! The engine alone works on plain text:
//!
//! ```
//! let page = pdfmeasure::measure_text("Slab 250mm on 3 m grid, 45 bays");
//! assert_eq!(page.totals.total_mm, 250.0);
//! assert_eq!(page.totals.total_m, 3.0);
//! assert_eq!(page.totals.total_unknown, 45.0);
//! ```
//!
//! ## Features
//!
//! - **Typed records**: closed unit and source enums, no stringly labels
//! - **Parallel processing**: pages are processed with Rayon
//! - **Remote services** (feature `remote`): optional text formatting and
//!   image analysis over HTTP, always falling back to local behavior

pub mod detect;
pub mod error;
pub mod levels;
pub mod measure;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod services;

// Re-export commonly used types
pub use detect::{detect_header, detect_header_from_path, is_pdf_bytes, PdfHeader};
pub use error::{Error, Result};
pub use levels::extract_levels;
pub use measure::{
    DocumentSummary, MeasureOptions, MeasurementKind, MeasurementRecord, PageMeasurements,
    PageTotals, Source, Unit, DEFAULT_ASSUMED_MM_THRESHOLD,
};
pub use model::{Annotation, Document, ImageData, LevelLine, Metadata, Page, PageImage};
pub use parser::{ErrorMode, PageSelection, ParseOptions, PdfParser};
pub use pipeline::{ExtractOptions, ExtractionReport, Extractor, ImageReport, PageReport};
pub use report::{OutputPaths, ReportWriter, Sheet, Workbook};
pub use services::{
    ImageAnalysis, ImageAnalyzer, PassthroughFormatter, ServiceConfig, TextFormatter,
};

#[cfg(feature = "remote")]
pub use services::{LlmFormatter, VisionAnalyzer};

use std::path::Path;

/// Parse a PDF file into pages of text, images and annotations.
///
/// # Example
///
/// ```no_run
/// use pdfmeasure::parse_file;
///
/// let doc = parse_file("plan.pdf").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    let parser = PdfParser::open(path)?;
    parser.parse()
}

/// Parse a PDF file with custom options.
///
/// ```no_run
/// use pdfmeasure::{parse_file_with_options, ParseOptions};
///
/// let doc = parse_file_with_options("plan.pdf", ParseOptions::new().text_only()).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Document> {
    let parser = PdfParser::open_with_options(path, options)?;
    parser.parse()
}

/// Parse a PDF from bytes.
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    let parser = PdfParser::from_bytes(data)?;
    parser.parse()
}

/// Run the full pipeline on a PDF file with default options.
///
/// No remote services are used: page text is measured as extracted and
/// images are not analyzed.
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<ExtractionReport> {
    Extractor::new().extract_file(path)
}

/// Measure a single piece of text as page 1 with default options.
pub fn measure_text(text: &str) -> PageMeasurements {
    measure::measure_page(1, text, &MeasureOptions::default())
}

/// Extract an in-memory PDF and return the per-page totals.
///
/// ```no_run
/// let data = std::fs::read("plan.pdf").unwrap();
/// let summary = pdfmeasure::summarize_bytes(&data).unwrap();
/// println!("{} pages", summary.len());
/// ```
pub fn summarize_bytes(data: &[u8]) -> Result<DocumentSummary> {
    let document = PdfParser::from_bytes_with_options(data, ParseOptions::new().text_only())?
        .parse()?;
    Ok(Extractor::new().extract_document(&document).summary)
}
