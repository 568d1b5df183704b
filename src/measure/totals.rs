//! Per-page totals and the document summary.

use serde::{Deserialize, Serialize};

use super::record::{MeasurementRecord, Unit};

/// Sum of each measurement category on one page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PageTotals {
    /// Page number (1-indexed); 0 for a document-wide total
    pub page_number: u32,

    pub total_sq_m: f64,

    /// Explicit and assumed millimetres together
    pub total_mm: f64,

    pub total_m: f64,

    pub total_unknown: f64,
}

impl PageTotals {
    /// All-zero totals for a page.
    pub fn zero(page_number: u32) -> Self {
        Self {
            page_number,
            ..Default::default()
        }
    }

    /// Sum records by unit bucket.
    ///
    /// Explicit millimetres are summed before assumed ones are added, which
    /// matters only for floating point rounding. Folds start from +0.0 so an
    /// empty bucket never reports `-0.0`.
    pub fn from_records(page_number: u32, records: &[MeasurementRecord]) -> Self {
        let sum = |unit: Unit| -> f64 {
            records
                .iter()
                .filter(|r| r.unit() == unit)
                .fold(0.0, |acc, r| acc + r.value())
        };

        Self {
            page_number,
            total_sq_m: sum(Unit::SqM),
            total_mm: sum(Unit::Mm) + sum(Unit::MmAssumed),
            total_m: sum(Unit::M),
            total_unknown: sum(Unit::Unknown),
        }
    }

    /// Check if every total is zero.
    pub fn is_zero(&self) -> bool {
        self.total_sq_m == 0.0
            && self.total_mm == 0.0
            && self.total_m == 0.0
            && self.total_unknown == 0.0
    }

    /// The totals line written under each page sheet.
    pub fn summary_line(&self) -> String {
        format!(
            "TOTALS: sq m = {:?}, mm = {:?}, m = {:?}, unknown = {:?}",
            self.total_sq_m, self.total_mm, self.total_m, self.total_unknown
        )
    }
}

/// Totals of every processed page, in page order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentSummary {
    pages: Vec<PageTotals>,
}

impl DocumentSummary {
    /// Per-page totals in page order.
    pub fn pages(&self) -> &[PageTotals] {
        &self.pages
    }

    /// Number of pages in the summary.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Check if no page was processed.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Totals of a page by page number.
    pub fn page(&self, page_number: u32) -> Option<&PageTotals> {
        self.pages.iter().find(|p| p.page_number == page_number)
    }

    /// Fold every page into one row with page number 0.
    pub fn grand_total(&self) -> PageTotals {
        self.pages.iter().fold(PageTotals::zero(0), |acc, p| PageTotals {
            page_number: 0,
            total_sq_m: acc.total_sq_m + p.total_sq_m,
            total_mm: acc.total_mm + p.total_mm,
            total_m: acc.total_m + p.total_m,
            total_unknown: acc.total_unknown + p.total_unknown,
        })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PageTotals> {
        self.pages.iter()
    }
}

impl<'a> IntoIterator for &'a DocumentSummary {
    type Item = &'a PageTotals;
    type IntoIter = std::slice::Iter<'a, PageTotals>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}

/// Collects page totals, possibly out of order, into a summary.
#[derive(Debug, Clone, Default)]
pub struct SummaryBuilder {
    pages: Vec<PageTotals>,
}

impl SummaryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the totals of one page.
    pub fn push(&mut self, totals: PageTotals) {
        self.pages.push(totals);
    }

    /// Number of pages collected so far.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Sort by page number and finish the summary.
    pub fn finish(mut self) -> DocumentSummary {
        self.pages.sort_by_key(|p| p.page_number);
        DocumentSummary { pages: self.pages }
    }
}

impl Extend<PageTotals> for SummaryBuilder {
    fn extend<I: IntoIterator<Item = PageTotals>>(&mut self, iter: I) {
        self.pages.extend(iter);
    }
}

impl FromIterator<PageTotals> for DocumentSummary {
    fn from_iter<I: IntoIterator<Item = PageTotals>>(iter: I) -> Self {
        let mut builder = SummaryBuilder::new();
        builder.extend(iter);
        builder.finish()
    }
}
