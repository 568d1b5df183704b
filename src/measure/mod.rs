//! Measurement extraction and classification.
//!
//! A page's text goes through three stages:
//!
//! 1. [`extract_candidates`] finds numeric literals tagged "sq m", "mm" or
//!    "m", and loose literals whose text was not tagged anywhere on the page.
//! 2. A [`Classifier`] moves implausibly large loose values into the
//!    assumed-millimetre bucket and leaves the rest as unknown.
//! 3. [`build_records`] emits one [`MeasurementRecord`] per value and
//!    [`PageTotals::from_records`] sums them.
//!
//! Every stage is a pure function of its input. Nothing here fails: a
//! literal that does not parse is dropped and a page without numbers yields
//! zero totals.
//!
//! ```
//! use pdfmeasure::measure::{measure_page, MeasureOptions};
//!
//! let page = measure_page(1, "Area: 12.5 sq m, wall 3000mm, height 2m", &MeasureOptions::default());
//! assert_eq!(page.records.len(), 3);
//! assert_eq!(page.totals.total_mm, 3000.0);
//! ```

mod classifier;
mod extractor;
mod record;
mod totals;

pub use classifier::{Classifier, LooseClass, DEFAULT_ASSUMED_MM_THRESHOLD};
pub use extractor::{
    extract_candidates, normalize_literal, tokenize, Candidates, NumericToken, TokenSet,
};
pub use record::{build_records, MeasurementKind, MeasurementRecord, Source, Unit};
pub use totals::{DocumentSummary, PageTotals, SummaryBuilder};

use serde::Serialize;

/// Options for the measurement engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasureOptions {
    /// Loose values strictly above this are assumed to be millimetres
    pub assumed_mm_threshold: f64,
}

impl MeasureOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the assumed-millimetre threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.assumed_mm_threshold = threshold;
        self
    }

    /// Classifier configured by these options.
    pub fn classifier(&self) -> Classifier {
        Classifier::new(self.assumed_mm_threshold)
    }
}

impl Default for MeasureOptions {
    fn default() -> Self {
        Self {
            assumed_mm_threshold: DEFAULT_ASSUMED_MM_THRESHOLD,
        }
    }
}

/// Measurements of one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageMeasurements {
    /// Page number (1-indexed)
    pub page_number: u32,

    /// Records in category order
    pub records: Vec<MeasurementRecord>,

    /// Per-category sums
    pub totals: PageTotals,
}

impl PageMeasurements {
    /// Records of one kind, in text order.
    pub fn records_of(&self, kind: MeasurementKind) -> impl Iterator<Item = &MeasurementRecord> {
        self.records.iter().filter(move |r| r.kind() == kind)
    }

    /// Number of records needing confirmation.
    pub fn unknown_count(&self) -> usize {
        self.records_of(MeasurementKind::Unknown).count()
    }
}

/// Run the engine on one page of text.
pub fn measure_page(page_number: u32, text: &str, options: &MeasureOptions) -> PageMeasurements {
    let candidates = extract_candidates(text);
    let records = build_records(&candidates, &options.classifier());
    let totals = PageTotals::from_records(page_number, &records);

    log::debug!(
        "Page {}: {} measurements ({} sq m, {} mm, {} m, {} loose)",
        page_number,
        records.len(),
        candidates.sq_m.len(),
        candidates.mm.len(),
        candidates.m.len(),
        candidates.loose.len()
    );

    PageMeasurements {
        page_number,
        records,
        totals,
    }
}

/// Run the engine on a sequence of page texts numbered from 1.
pub fn measure_pages<'a, I>(pages: I, options: &MeasureOptions) -> (Vec<PageMeasurements>, DocumentSummary)
where
    I: IntoIterator<Item = &'a str>,
{
    let measured: Vec<_> = pages
        .into_iter()
        .zip(1u32..)
        .map(|(text, page_number)| measure_page(page_number, text, options))
        .collect();
    let summary = measured.iter().map(|p| p.totals).collect();
    (measured, summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_page_scenario() {
        let page = measure_page(
            1,
            "Area: 12.5 sq m, wall 3000mm, height 2m",
            &MeasureOptions::default(),
        );

        assert_eq!(
            page.records,
            vec![
                MeasurementRecord::new(12.5, MeasurementKind::ExplicitSqM),
                MeasurementRecord::new(3000.0, MeasurementKind::ExplicitMm),
                MeasurementRecord::new(2.0, MeasurementKind::ExplicitM),
            ]
        );
        assert_eq!(page.totals.total_sq_m, 12.5);
        assert_eq!(page.totals.total_mm, 3000.0);
        assert_eq!(page.totals.total_m, 2.0);
        assert_eq!(page.totals.total_unknown, 0.0);
    }

    #[test]
    fn test_threshold_option() {
        let options = MeasureOptions::new().with_threshold(40.0);
        let page = measure_page(2, "Room 10, corridor 45", &options);

        assert_eq!(page.records_of(MeasurementKind::AssumedMm).count(), 1);
        assert_eq!(page.unknown_count(), 1);
        assert_eq!(page.totals.total_mm, 45.0);
        assert_eq!(page.totals.total_unknown, 10.0);
    }

    #[test]
    fn test_measure_pages_numbers_from_one() {
        let (pages, summary) = measure_pages(
            ["12 mm", "nothing", "3 m"],
            &MeasureOptions::default(),
        );

        assert_eq!(pages.len(), 3);
        assert_eq!(summary.len(), 3);
        assert_eq!(summary.pages()[1].page_number, 2);
        assert!(summary.pages()[1].is_zero());
        assert_eq!(summary.pages()[2].total_m, 3.0);
    }
}
