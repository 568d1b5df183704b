//! Report output: the consolidated workbook, the per-page totals summary
//! and the on-disk layout of a processed document.

mod workbook;
mod writer;

pub use workbook::{format_value, summary_csv, write_summary_csv, JsonFormat, Sheet, Workbook};
pub use writer::{OutputPaths, ReportWriter};
