use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::Summarizer;
use crate::config::GeminiConfig;
use crate::SummarizerError;

/// Google Gemini `generateContent` response, trimmed to what we read
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Summarizer backed by the Gemini REST API
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Request URL; the key travels in a header so it never appears here
    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url,
            urlencoding::encode(model)
        )
    }
}

#[async_trait]
impl Summarizer for GeminiClient {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, SummarizerError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            SummarizerError::SummarizationFailure("API key not configured".to_string())
        })?;

        tracing::debug!(model = %model, prompt_chars = prompt.len(), "POST generateContent");

        let response = self
            .client
            .post(self.endpoint(model))
            .header(API_KEY_HEADER, api_key)
            .json(&json!({
                "contents": [{ "parts": [{ "text": prompt }] }]
            }))
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        let body = response.text().await.map_err(request_error)?;

        if !status.is_success() {
            return Err(SummarizerError::SummarizationFailure(format!(
                "HTTP {}: {}",
                status,
                api_error_message(&body)
            )));
        }

        extract_text(&body)
    }
}

fn request_error(e: reqwest::Error) -> SummarizerError {
    if e.is_timeout() {
        SummarizerError::SummarizationFailure("Request timed out".to_string())
    } else {
        SummarizerError::SummarizationFailure(e.without_url().to_string())
    }
}

/// Error message from a Gemini error body, or the raw body if it is not JSON
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| crate::utils::truncate_for_log(body, 200))
}

/// Concatenate the parts of the first candidate
pub fn extract_text(body: &str) -> Result<String, SummarizerError> {
    let response: GenerateContentResponse = serde_json::from_str(body).map_err(|e| {
        SummarizerError::SummarizationFailure(format!("Invalid API response: {}", e))
    })?;

    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(SummarizerError::SummarizationFailure(format!(
            "Prompt blocked: {}",
            reason
        )));
    }

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(SummarizerError::SummarizationFailure(
            "Response contained no text".to_string(),
        ));
    }

    Ok(text)
}
