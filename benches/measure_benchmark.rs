//! Benchmarks for the measurement engine.
//!
//! Run with: cargo bench
//!
//! Page texts are synthetic drawing notes with a mix of tagged and loose
//! numbers.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pdfmeasure::measure::{extract_candidates, measure_page, MeasureOptions};
use pdfmeasure::{Document, Extractor, Page};

/// Creates page text with `lines` lines of notes.
fn create_page_text(lines: usize) -> String {
    (0..lines)
        .map(|i| match i % 4 {
            0 => format!("Room {} area {}.5 sq m", i, i * 3),
            1 => format!("Wall build-up {}mm, lintel {} mm", 100 + i, 2400 + i),
            2 => format!("FFL +{}.250 m, grid 1,{:03}", i % 9, i),
            _ => format!("Ref {} / sheet {} of 40", 120_000_000_000u64 + i as u64, i),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Benchmark candidate extraction at various page sizes.
fn bench_extract_candidates(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_candidates");

    for lines in [10, 100, 1000].iter() {
        let text = create_page_text(*lines);

        group.bench_function(format!("{}_lines", lines), |b| {
            b.iter(|| extract_candidates(black_box(&text)));
        });
    }

    group.finish();
}

/// Benchmark a full page: extraction, classification and totals.
fn bench_measure_page(c: &mut Criterion) {
    let text = create_page_text(100);
    let options = MeasureOptions::default();

    c.bench_function("measure_page_100_lines", |b| {
        b.iter(|| measure_page(1, black_box(&text), &options));
    });
}

/// Benchmark the pipeline over a document, parallel and sequential.
fn bench_extract_document(c: &mut Criterion) {
    let mut doc = Document::new();
    for n in 1..=50 {
        doc.add_page(Page::with_text(n, create_page_text(60)));
    }

    let mut group = c.benchmark_group("extract_document_50_pages");
    group.bench_function("parallel", |b| {
        let extractor = Extractor::new();
        b.iter(|| extractor.extract_document(black_box(&doc)));
    });
    group.bench_function("sequential", |b| {
        let extractor = Extractor::new().sequential();
        b.iter(|| extractor.extract_document(black_box(&doc)));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_extract_candidates,
    bench_measure_page,
    bench_extract_document,
);
criterion_main!(benches);
