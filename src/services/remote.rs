//! HTTP clients for the formatting and vision services.

use std::collections::BTreeMap;

use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::{ImageAnalysis, ImageAnalyzer, ServiceConfig, TextFormatter};
use crate::error::{Error, Result};

const SYSTEM_PROMPT: &str = "You are a text formatting assistant. Your task is to reformat the \
provided page text into clearly defined sections. Please ensure your response contains the \
entire content, formatted perfectly with no extra commentary.";

const USER_PREFACE: &str = "Data : \n";

fn build_client(config: &ServiceConfig) -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|e| Error::Service(format!("Failed to build HTTP client: {}", e)))
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    max_new_tokens: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    assistant: Option<AssistantMessage>,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

/// Formats page text through a chat-style generation endpoint.
pub struct LlmFormatter {
    client: reqwest::blocking::Client,
    url: String,
    config: ServiceConfig,
}

impl LlmFormatter {
    /// Create a formatter posting to `url`.
    pub fn new(url: impl Into<String>, config: ServiceConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(&config)?,
            url: url.into(),
            config,
        })
    }

    /// Create a formatter from the configured endpoint, if there is one.
    pub fn from_config(config: &ServiceConfig) -> Result<Option<Self>> {
        config
            .llm_url
            .clone()
            .map(|url| Self::new(url, config.clone()))
            .transpose()
    }

    fn request(&self, text: &str) -> std::result::Result<Option<String>, reqwest::Error> {
        let user = format!("{}{}", USER_PREFACE, text);
        let body = GenerateRequest {
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user,
                },
            ],
            max_new_tokens: self.config.max_new_tokens,
            temperature: self.config.temperature,
            top_p: self.config.top_p,
        };

        let response = self.client.post(&self.url).json(&body).send()?.error_for_status()?;
        let parsed: GenerateResponse = response.json()?;
        Ok(parsed.assistant.and_then(|a| a.content))
    }
}

impl TextFormatter for LlmFormatter {
    fn format(&self, text: &str, page_number: u32) -> String {
        match self.request(text) {
            Ok(Some(formatted)) => formatted,
            Ok(None) => {
                log::warn!(
                    "Formatting response for page {} has no content; keeping original text",
                    page_number
                );
                text.to_string()
            }
            Err(e) => {
                log::warn!("Formatting call failed for page {}: {}", page_number, e);
                text.to_string()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct VisionResponse {
    #[serde(default)]
    unconditional_caption: String,
    #[serde(default)]
    pdf_classification: BTreeMap<String, f64>,
    #[serde(default)]
    vilt_results: Vec<(String, f64)>,
}

impl From<VisionResponse> for ImageAnalysis {
    fn from(r: VisionResponse) -> Self {
        Self {
            unconditional_caption: r.unconditional_caption,
            pdf_classification: r.pdf_classification.into_iter().collect(),
            vilt_results: r.vilt_results,
        }
    }
}

/// Sends base64-encoded images to an analysis endpoint.
pub struct VisionAnalyzer {
    client: reqwest::blocking::Client,
    url: String,
}

impl VisionAnalyzer {
    /// Create an analyzer posting to `url`.
    pub fn new(url: impl Into<String>, config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config)?,
            url: url.into(),
        })
    }

    /// Create an analyzer from the configured endpoint, if there is one.
    pub fn from_config(config: &ServiceConfig) -> Result<Option<Self>> {
        config
            .vision_url
            .clone()
            .map(|url| Self::new(url, config))
            .transpose()
    }

    fn request(&self, image: &[u8]) -> std::result::Result<ImageAnalysis, reqwest::Error> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image);
        let response = self.client.post(&self.url).body(encoded).send()?.error_for_status()?;
        let parsed: VisionResponse = response.json()?;
        Ok(parsed.into())
    }
}

impl ImageAnalyzer for VisionAnalyzer {
    fn analyze(&self, image: &[u8], page_number: u32, index: usize) -> Option<ImageAnalysis> {
        match self.request(image) {
            Ok(analysis) => Some(analysis),
            Err(e) => {
                log::warn!(
                    "Vision call failed for image {}_{}: {}",
                    page_number,
                    index,
                    e
                );
                None
            }
        }
    }
}
