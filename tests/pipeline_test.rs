//! Integration tests for the extraction pipeline with stub services.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pdfmeasure::{
    Annotation, Document, Extractor, ImageAnalysis, ImageAnalyzer, ImageData, MeasureOptions,
    Page, TextFormatter,
};

/// Formatter whose service is always down.
#[derive(Default)]
struct FailingFormatter {
    calls: AtomicUsize,
}

impl TextFormatter for FailingFormatter {
    fn format(&self, text: &str, _page_number: u32) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        text.to_string()
    }
}

/// Formatter that puts every sentence on its own line.
struct LineFormatter;

impl TextFormatter for LineFormatter {
    fn format(&self, text: &str, _page_number: u32) -> String {
        text.replace(". ", ".\n")
    }
}

/// Analyzer that only recognizes JPEG data.
struct JpegOnlyAnalyzer;

impl ImageAnalyzer for JpegOnlyAnalyzer {
    fn analyze(&self, image: &[u8], page_number: u32, index: usize) -> Option<ImageAnalysis> {
        if !image.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return None;
        }
        Some(ImageAnalysis {
            unconditional_caption: format!("image {} on page {}", index, page_number),
            pdf_classification: vec![("drawing".to_string(), 0.9)],
            vilt_results: Vec::new(),
        })
    }
}

fn document(texts: &[&str]) -> Document {
    let mut doc = Document::new();
    for (i, text) in texts.iter().enumerate() {
        doc.add_page(Page::with_text(i as u32 + 1, *text));
    }
    doc.metadata.page_count = doc.page_count();
    doc
}

#[test]
fn test_many_pages_parallel_keep_order() {
    let texts: Vec<String> = (1..=64).map(|n| format!("span {} m", n)).collect();
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    let report = Extractor::new().extract_document(&document(&refs));

    assert_eq!(report.pages.len(), 64);
    for (i, totals) in report.summary.iter().enumerate() {
        assert_eq!(totals.page_number, i as u32 + 1);
        assert_eq!(totals.total_m, (i + 1) as f64);
    }
}

#[test]
fn test_parallel_matches_sequential() {
    let doc = document(&["12 sq m", "", "Level 2 slab 200mm", "ids 10, 20"]);
    let parallel = Extractor::new().extract_document(&doc);
    let sequential = Extractor::new().sequential().extract_document(&doc);

    assert_eq!(parallel.summary, sequential.summary);
    assert_eq!(parallel.record_count(), sequential.record_count());
}

#[test]
fn test_failed_formatting_keeps_original_text() {
    let formatter = Arc::new(FailingFormatter::default());
    let doc = document(&["wall 3000mm", "height 2m"]);
    let report = Extractor::new()
        .with_formatter(formatter.clone())
        .extract_document(&doc);

    assert_eq!(formatter.calls.load(Ordering::SeqCst), 2);
    assert_eq!(report.pages[0].text, "wall 3000mm");
    assert_eq!(report.summary.pages()[0].total_mm, 3000.0);
    assert_eq!(report.summary.pages()[1].total_m, 2.0);
}

#[test]
fn test_levels_come_from_formatted_text() {
    let doc = document(&["Section A. FFL +3.000. Roof"]);
    let report = Extractor::new()
        .with_formatter(Arc::new(LineFormatter))
        .extract_document(&doc);

    let lines: Vec<_> = report.levels().map(|l| l.line.as_str()).collect();
    assert_eq!(lines, vec!["FFL +3.000."]);
}

#[test]
fn test_image_analysis_is_best_effort() {
    let mut doc = document(&["plan"]);
    let page = &mut doc.pages[0];
    page.add_image(ImageData::jpeg(vec![0xFF, 0xD8, 0xFF, 0xE0]));
    page.add_image(ImageData::new(vec![1, 2, 3], "application/octet-stream"));

    let report = Extractor::new()
        .with_analyzer(Arc::new(JpegOnlyAnalyzer))
        .extract_document(&doc);

    let images = &report.pages[0].images;
    assert_eq!(images.len(), 2);
    assert_eq!(
        images[0].analysis.as_ref().map(|a| a.unconditional_caption.as_str()),
        Some("image 1 on page 1")
    );
    assert!(images[1].analysis.is_none());
}

#[test]
fn test_without_analyzer_images_are_kept() {
    let mut doc = document(&[""]);
    doc.pages[0].add_image(ImageData::jpeg(vec![0xFF, 0xD8, 0xFF]));

    let report = Extractor::new().extract_document(&doc);
    assert_eq!(report.pages[0].images.len(), 1);
    assert!(report.pages[0].images[0].analysis.is_none());
}

#[test]
fn test_annotations_are_carried() {
    let mut doc = document(&["", ""]);
    doc.pages[1].add_annotation(Annotation::new(2, Some("Text".to_string()), "check 450mm"));

    let report = Extractor::new().extract_document(&doc);
    let notes: Vec<_> = report.annotations().collect();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].page, 2);
    // Annotation content is reported, not measured
    assert!(report.summary.pages()[1].is_zero());
}

#[test]
fn test_measure_options_reach_the_engine() {
    let doc = document(&["ref 5000"]);
    let report = Extractor::new()
        .with_measure_options(MeasureOptions::new().with_threshold(4999.0))
        .extract_document(&doc);

    assert_eq!(report.summary.pages()[0].total_mm, 5000.0);
    assert_eq!(report.summary.pages()[0].total_unknown, 0.0);
}

#[test]
fn test_report_serializes_without_image_bytes() {
    let mut doc = document(&["12 mm"]);
    doc.pages[0].add_image(ImageData::jpeg(vec![0xFF, 0xD8, 0xFF]));

    let report = Extractor::new().extract_document(&doc);
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["pages"][0]["images"][0]["index"], 1);
    assert!(json["pages"][0]["images"][0]["image"].get("data").is_none());
    assert_eq!(json["summary"][0]["total_mm"], 12.0);
}
