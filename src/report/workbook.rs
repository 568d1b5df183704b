//! Tabular sheets built from an extraction report.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::measure::{DocumentSummary, MeasurementRecord, PageTotals};
use crate::pipeline::{ExtractionReport, PageReport};

const RECORD_HEADERS: [&str; 3] = ["Measurement Value", "Unit", "Source"];
const TOTALS_HEADERS: [&str; 5] = ["Total sq m", "Total mm", "Total m", "Total unknown", "Page"];

/// Format a value the way the report prints floats ("3000.0", "12.5").
pub fn format_value(value: f64) -> String {
    format!("{:?}", value)
}

/// A named table of string cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Create an empty sheet.
    pub fn new(name: impl Into<String>, headers: &[&str]) -> Self {
        Self {
            name: name.into(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row.
    pub fn push_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    /// Sheet of one page's records followed by the totals line.
    pub fn for_page(page: &PageReport) -> Self {
        let mut sheet = Sheet::new(format!("Page_{}", page.page_number), &RECORD_HEADERS);
        for record in &page.measurements.records {
            sheet.push_row(record_row(record));
        }
        sheet.push_row([page.measurements.totals.summary_line(), String::new(), String::new()]);
        sheet
    }

    /// Row-per-page totals sheet.
    pub fn for_summary(summary: &DocumentSummary) -> Self {
        let mut sheet = Sheet::new("Totals", &TOTALS_HEADERS);
        for totals in summary {
            sheet.push_row(totals_row(totals));
        }
        sheet
    }

    /// Render as CSV, header first.
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| Error::Report(format!("CSV flush failed: {}", e)))?;
        String::from_utf8(bytes).map_err(|e| Error::Report(e.to_string()))
    }

    /// Write as a CSV file.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_csv()?)?;
        Ok(())
    }
}

fn record_row(record: &MeasurementRecord) -> [String; 3] {
    [
        format_value(record.value()),
        record.unit().label().to_string(),
        record.source().label().to_string(),
    ]
}

fn totals_row(totals: &PageTotals) -> [String; 5] {
    [
        format_value(totals.total_sq_m),
        format_value(totals.total_mm),
        format_value(totals.total_m),
        format_value(totals.total_unknown),
        totals.page_number.to_string(),
    ]
}

/// CSV text of the row-per-page summary.
pub fn summary_csv(summary: &DocumentSummary) -> Result<String> {
    Sheet::for_summary(summary).to_csv()
}

/// Write the row-per-page summary as a CSV file.
pub fn write_summary_csv(path: &Path, summary: &DocumentSummary) -> Result<()> {
    Sheet::for_summary(summary).write_csv(path)
}

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// An ordered set of sheets.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Build the consolidated workbook of a report.
    ///
    /// Sheets: Metadata, one Page_N per page, Totals, then Annotations and
    /// Levels when the document has any.
    pub fn from_report(report: &ExtractionReport) -> Self {
        let mut sheets = Vec::with_capacity(report.pages.len() + 4);

        let mut metadata = Sheet::new("Metadata", &["Property", "Value"]);
        for (property, value) in report.metadata.properties() {
            metadata.push_row([property.to_string(), value]);
        }
        sheets.push(metadata);

        sheets.extend(report.pages.iter().map(Sheet::for_page));
        sheets.push(Sheet::for_summary(&report.summary));

        let mut annotations = Sheet::new("Annotations", &["Page", "Annotation Type", "Content"]);
        for a in report.annotations() {
            annotations.push_row([
                a.page.to_string(),
                a.annotation_type.clone().unwrap_or_default(),
                a.content.clone(),
            ]);
        }
        if !annotations.rows.is_empty() {
            sheets.push(annotations);
        }

        let mut levels = Sheet::new("Levels", &["Page", "Line"]);
        for l in report.levels() {
            levels.push_row([l.page.to_string(), l.line.clone()]);
        }
        if !levels.rows.is_empty() {
            sheets.push(levels);
        }

        Self { sheets }
    }

    /// Look up a sheet by name.
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Sheet names in order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Write one `<name>.csv` per sheet into `dir`, creating it if needed.
    pub fn write_csv_dir(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)?;
        self.sheets
            .iter()
            .map(|sheet| {
                let path = dir.join(format!("{}.csv", sheet.name));
                sheet.write_csv(&path)?;
                Ok(path)
            })
            .collect()
    }

    /// Serialize every sheet to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        let json = match format {
            JsonFormat::Pretty => serde_json::to_string_pretty(self)?,
            JsonFormat::Compact => serde_json::to_string(self)?,
        };
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::{measure_page, MeasureOptions};

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(3000.0), "3000.0");
        assert_eq!(format_value(12.5), "12.5");
        assert_eq!(format_value(0.0), "0.0");
    }

    #[test]
    fn test_summary_csv() {
        let summary: DocumentSummary = [
            PageTotals {
                page_number: 1,
                total_sq_m: 12.5,
                total_mm: 3000.0,
                total_m: 2.0,
                total_unknown: 0.0,
            },
            PageTotals::zero(2),
        ]
        .into_iter()
        .collect();

        let csv = summary_csv(&summary).unwrap();
        assert_eq!(
            csv,
            "Total sq m,Total mm,Total m,Total unknown,Page\n\
             12.5,3000.0,2.0,0.0,1\n\
             0.0,0.0,0.0,0.0,2\n"
        );
    }

    #[test]
    fn test_page_sheet_ends_with_totals() {
        let measurements =
            measure_page(1, "Room 10, corridor 45, 10.0 wide", &MeasureOptions::default());
        let page = PageReport {
            page_number: 1,
            text: String::new(),
            measurements,
            levels: Vec::new(),
            annotations: Vec::new(),
            images: Vec::new(),
        };

        let sheet = Sheet::for_page(&page);
        assert_eq!(sheet.name, "Page_1");
        assert_eq!(sheet.rows.len(), 4);
        assert_eq!(sheet.rows[0], vec!["10.0", "unknown (confirm)", "unknown"]);
        assert_eq!(
            sheet.rows[3][0],
            "TOTALS: sq m = 0.0, mm = 0.0, m = 0.0, unknown = 65.0"
        );
    }

    #[test]
    fn test_csv_quotes_commas() {
        let mut sheet = Sheet::new("Levels", &["Page", "Line"]);
        sheet.push_row(["1", "FFL +3.000, see note"]);
        let csv = sheet.to_csv().unwrap();
        assert!(csv.contains("\"FFL +3.000, see note\""));
    }
}
