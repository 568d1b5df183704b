//! Writes an extraction report to disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::workbook::{write_summary_csv, JsonFormat, Workbook};
use crate::error::Result;
use crate::pipeline::ExtractionReport;

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Paths of everything written for one document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OutputPaths {
    /// `<output_dir>/<pdf stem>`
    pub folder: PathBuf,
    pub page_texts: Vec<PathBuf>,
    pub images: Vec<PathBuf>,
    pub analyses: Vec<PathBuf>,
    /// Directory holding one CSV per sheet
    pub workbook_dir: PathBuf,
    pub sheets: Vec<PathBuf>,
    pub workbook_json: PathBuf,
    pub summary_csv: PathBuf,
}

impl OutputPaths {
    /// Number of files written.
    pub fn file_count(&self) -> usize {
        self.page_texts.len() + self.images.len() + self.analyses.len() + self.sheets.len() + 2
    }
}

/// Writes page texts, images, the workbook and the totals summary.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
    timestamp: String,
}

impl ReportWriter {
    /// Create a writer stamped with the current local time.
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            timestamp: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// Use a fixed timestamp in file names.
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Folder used for a source document: the output directory joined with
    /// the file stem of `source`.
    pub fn folder_for(&self, source: &Path) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        self.output_dir.join(stem)
    }

    /// Write every output of `report`, extracted from `source`.
    pub fn write(&self, source: &Path, report: &ExtractionReport) -> Result<OutputPaths> {
        let folder = self.folder_for(source);
        fs::create_dir_all(&folder)?;

        let mut paths = OutputPaths {
            folder: folder.clone(),
            ..Default::default()
        };

        let images_dir = folder.join("images");
        fs::create_dir_all(&images_dir)?;
        for page in &report.pages {
            let text_path = folder.join(format!("page_{}.txt", page.page_number));
            fs::write(&text_path, &page.text)?;
            paths.page_texts.push(text_path);

            for entry in &page.images {
                let image_path = images_dir.join(entry.image.file_name(page.page_number));
                fs::write(&image_path, &entry.image.image.data)?;
                paths.images.push(image_path);

                if let Some(analysis) = &entry.analysis {
                    let analysis_path =
                        images_dir.join(entry.image.analysis_file_name(page.page_number));
                    fs::write(&analysis_path, analysis.to_report_text())?;
                    paths.analyses.push(analysis_path);
                }
            }
        }

        let workbook = Workbook::from_report(report);
        paths.workbook_dir = folder.join(format!("extracted_data_{}", self.timestamp));
        paths.sheets = workbook.write_csv_dir(&paths.workbook_dir)?;

        paths.workbook_json = folder.join(format!("extracted_data_{}.json", self.timestamp));
        fs::write(&paths.workbook_json, workbook.to_json(JsonFormat::Pretty)?)?;

        paths.summary_csv = folder.join(format!("overall_measurements_{}.csv", self.timestamp));
        write_summary_csv(&paths.summary_csv, &report.summary)?;

        log::debug!(
            "Wrote {} files under {}",
            paths.file_count(),
            folder.display()
        );
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Document, Page};
    use crate::pipeline::Extractor;

    #[test]
    fn test_folder_for_uses_stem() {
        let writer = ReportWriter::new("/tmp/out");
        assert_eq!(
            writer.folder_for(Path::new("/data/plans/A-101.pdf")),
            PathBuf::from("/tmp/out/A-101")
        );
    }

    #[test]
    fn test_timestamp_format() {
        let writer = ReportWriter::new("out");
        let ts = writer.timestamp();
        assert_eq!(ts.len(), 15);
        assert_eq!(&ts[8..9], "_");
    }

    #[test]
    fn test_write_text_only_report() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = Document::new();
        doc.add_page(Page::with_text(1, "Room 12.5 sq m, wall 3000mm"));
        let report = Extractor::new().sequential().extract_document(&doc);

        let paths = ReportWriter::new(dir.path())
            .with_timestamp("20240101_120000")
            .write(Path::new("plan.pdf"), &report)
            .unwrap();

        assert_eq!(paths.folder, dir.path().join("plan"));
        assert!(paths.images.is_empty());
        assert!(paths.folder.join("images").is_dir());
        assert_eq!(
            fs::read_to_string(&paths.page_texts[0]).unwrap(),
            "Room 12.5 sq m, wall 3000mm"
        );
        assert!(paths
            .summary_csv
            .ends_with("overall_measurements_20240101_120000.csv"));
    }
}
