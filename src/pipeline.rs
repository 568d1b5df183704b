//! Per-document extraction pipeline.
//!
//! For every page the pipeline formats the text, measures it, picks out
//! level lines and analyzes embedded images. Pages are independent, so they
//! are processed in parallel with rayon and put back in page order
//! afterwards.

use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;

use crate::error::Result;
use crate::levels::extract_levels;
use crate::measure::{
    measure_page, DocumentSummary, MeasureOptions, PageMeasurements, SummaryBuilder,
};
use crate::model::{Annotation, Document, LevelLine, Metadata, Page, PageImage};
use crate::parser::{PageSelection, ParseOptions, PdfParser};
use crate::services::{ImageAnalysis, ImageAnalyzer, PassthroughFormatter, TextFormatter};

/// Options for the extraction pipeline.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// How the document is read
    pub parse: ParseOptions,

    /// Measurement engine settings
    pub measure: MeasureOptions,

    /// Whether to process pages in parallel
    pub parallel: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            parse: ParseOptions::default(),
            measure: MeasureOptions::default(),
            parallel: true,
        }
    }
}

/// An image of a page together with its analysis, if any.
#[derive(Debug, Clone, Serialize)]
pub struct ImageReport {
    #[serde(flatten)]
    pub image: PageImage,

    pub analysis: Option<ImageAnalysis>,
}

/// Everything extracted from one page.
#[derive(Debug, Clone, Serialize)]
pub struct PageReport {
    /// Page number (1-indexed)
    pub page_number: u32,

    /// Text after formatting
    pub text: String,

    pub measurements: PageMeasurements,

    pub levels: Vec<LevelLine>,

    pub annotations: Vec<Annotation>,

    pub images: Vec<ImageReport>,
}

/// Everything extracted from a document.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    pub metadata: Metadata,

    /// Page reports in page order
    pub pages: Vec<PageReport>,

    /// Per-page totals in page order
    pub summary: DocumentSummary,
}

impl ExtractionReport {
    /// Annotations of all pages, in page order.
    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.pages.iter().flat_map(|p| p.annotations.iter())
    }

    /// Level lines of all pages, in page order.
    pub fn levels(&self) -> impl Iterator<Item = &LevelLine> {
        self.pages.iter().flat_map(|p| p.levels.iter())
    }

    /// Total number of measurement records.
    pub fn record_count(&self) -> usize {
        self.pages.iter().map(|p| p.measurements.records.len()).sum()
    }
}

/// Builder for running the pipeline.
///
/// ```no_run
/// use pdfmeasure::Extractor;
///
/// let report = Extractor::new().sequential().extract_file("plan.pdf")?;
/// for totals in &report.summary {
///     println!("page {}: {} mm", totals.page_number, totals.total_mm);
/// }
/// # Ok::<(), pdfmeasure::Error>(())
/// ```
pub struct Extractor {
    options: ExtractOptions,
    formatter: Arc<dyn TextFormatter>,
    analyzer: Option<Arc<dyn ImageAnalyzer>>,
}

impl Extractor {
    /// Create an extractor with a pass-through formatter and no image
    /// analysis.
    pub fn new() -> Self {
        Self {
            options: ExtractOptions::default(),
            formatter: Arc::new(PassthroughFormatter),
            analyzer: None,
        }
    }

    /// Set all options at once.
    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the parse options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.options.parse = options;
        self
    }

    /// Set the measurement options.
    pub fn with_measure_options(mut self, options: MeasureOptions) -> Self {
        self.options.measure = options;
        self
    }

    /// Restrict processing to some pages.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.options.parse = self.options.parse.with_pages(pages);
        self
    }

    /// Disable parallel page processing.
    pub fn sequential(mut self) -> Self {
        self.options.parallel = false;
        self
    }

    /// Use a text formatter.
    pub fn with_formatter(mut self, formatter: Arc<dyn TextFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    /// Use an image analyzer.
    pub fn with_analyzer(mut self, analyzer: Arc<dyn ImageAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    /// The options in use.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Read a PDF file and extract it.
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> Result<ExtractionReport> {
        let parser = PdfParser::open_with_options(path, self.options.parse.clone())?;
        let document = parser.parse()?;
        Ok(self.extract_document(&document))
    }

    /// Extract an already parsed document.
    pub fn extract_document(&self, document: &Document) -> ExtractionReport {
        let mut pages: Vec<PageReport> = if self.options.parallel {
            document
                .pages
                .par_iter()
                .map(|page| self.process_page(page))
                .collect()
        } else {
            document
                .pages
                .iter()
                .map(|page| self.process_page(page))
                .collect()
        };

        pages.sort_by_key(|p| p.page_number);
        let mut summary = SummaryBuilder::new();
        summary.extend(pages.iter().map(|p| p.measurements.totals));

        ExtractionReport {
            metadata: document.metadata.clone(),
            pages,
            summary: summary.finish(),
        }
    }

    fn process_page(&self, page: &Page) -> PageReport {
        let text = self.formatter.format(&page.text, page.number);
        let measurements = measure_page(page.number, &text, &self.options.measure);
        let levels = extract_levels(&text, page.number);

        let images = page
            .images
            .iter()
            .map(|image| ImageReport {
                image: image.clone(),
                analysis: self
                    .analyzer
                    .as_ref()
                    .and_then(|a| a.analyze(&image.image.data, page.number, image.index)),
            })
            .collect();

        PageReport {
            page_number: page.number,
            text,
            measurements,
            levels,
            annotations: page.annotations.clone(),
            images,
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}
