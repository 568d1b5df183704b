//! Remote text formatting and image analysis.
//!
//! Both services are best effort. A [`TextFormatter`] always returns usable
//! text (the input itself when the service fails) and an [`ImageAnalyzer`]
//! returns `None` on failure. Neither can abort a document.

#[cfg(feature = "remote")]
mod remote;

#[cfg(feature = "remote")]
pub use remote::{LlmFormatter, VisionAnalyzer};

use std::fmt::Write as _;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Reformats the text of a page.
pub trait TextFormatter: Send + Sync {
    /// Return the formatted text, or `text` unchanged on any failure.
    fn format(&self, text: &str, page_number: u32) -> String;
}

/// Formatter that returns the text as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughFormatter;

impl TextFormatter for PassthroughFormatter {
    fn format(&self, text: &str, _page_number: u32) -> String {
        text.to_string()
    }
}

/// Describes an image.
pub trait ImageAnalyzer: Send + Sync {
    /// Analyze image bytes; `None` when the analysis is unavailable.
    fn analyze(&self, image: &[u8], page_number: u32, index: usize) -> Option<ImageAnalysis>;
}

/// Result of an image analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageAnalysis {
    /// Free-form caption
    #[serde(default)]
    pub unconditional_caption: String,

    /// Label scores for the document domain classification
    #[serde(default)]
    pub pdf_classification: Vec<(String, f64)>,

    /// Label scores from visual question answering
    #[serde(default)]
    pub vilt_results: Vec<(String, f64)>,
}

impl ImageAnalysis {
    /// Render the analysis as the text file written next to the image.
    pub fn to_report_text(&self) -> String {
        let mut out = String::new();
        out.push_str("Unconditional Caption:\n");
        out.push_str(&self.unconditional_caption);
        out.push_str("\n\nPDF Domain Classification:\n");
        for (label, score) in &self.pdf_classification {
            let _ = writeln!(out, "{}: {:.4}", label, score);
        }
        out.push_str("\nVILT Domain Q&A Results:\n");
        for (label, score) in &self.vilt_results {
            let _ = writeln!(out, "{}: {:.4}", label, score);
        }
        out
    }
}

/// Endpoints and limits for the remote services.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Text formatting endpoint; formatting is skipped when unset
    pub llm_url: Option<String>,

    /// Image analysis endpoint; analysis is skipped when unset
    pub vision_url: Option<String>,

    /// Per-request timeout
    pub timeout: Duration,

    /// Token budget sent with formatting requests
    pub max_new_tokens: u32,

    /// Sampling temperature sent with formatting requests
    pub temperature: f32,

    /// Nucleus sampling cutoff sent with formatting requests
    pub top_p: f32,
}

impl ServiceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text formatting endpoint.
    pub fn with_llm_url(mut self, url: impl Into<String>) -> Self {
        self.llm_url = Some(url.into());
        self
    }

    /// Set the image analysis endpoint.
    pub fn with_vision_url(mut self, url: impl Into<String>) -> Self {
        self.vision_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            llm_url: None,
            vision_url: None,
            timeout: Duration::from_secs(120),
            max_new_tokens: 4000,
            temperature: 1.0,
            top_p: 0.9,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough_formatter() {
        let formatter = PassthroughFormatter;
        assert_eq!(formatter.format("  raw 12 mm ", 1), "  raw 12 mm ");
    }

    #[test]
    fn test_analysis_report_text() {
        let analysis = ImageAnalysis {
            unconditional_caption: "a floor plan".to_string(),
            pdf_classification: vec![("architecture".to_string(), 0.91234)],
            vilt_results: vec![("stairs".to_string(), 0.5)],
        };

        assert_eq!(
            analysis.to_report_text(),
            "Unconditional Caption:\na floor plan\n\n\
             PDF Domain Classification:\narchitecture: 0.9123\n\n\
             VILT Domain Q&A Results:\nstairs: 0.5000\n"
        );
    }

    #[test]
    fn test_service_config_defaults() {
        let config = ServiceConfig::new().with_llm_url("http://localhost:5050/generate");
        assert_eq!(config.llm_url.as_deref(), Some("http://localhost:5050/generate"));
        assert!(config.vision_url.is_none());
        assert_eq!(config.max_new_tokens, 4000);
        assert_eq!(config.timeout, Duration::from_secs(120));
    }
}
