//! Generative tips via the Gemini `generateContent` REST endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::tips::{TipError, TipSource};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(20),
        }
    }
}

/// Tip source backed by Gemini.
///
/// Without an API key every call fails with [`TipError::NotConfigured`]; wrap
/// it with [`tip_or_fallback`](crate::tip_or_fallback) or prefer
/// [`CannedTips`](crate::CannedTips) in that case.
pub struct GeminiTips {
    client: reqwest::Client,
    config: GeminiConfig,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

impl GeminiTips {
    pub fn new(config: GeminiConfig) -> Result<Self, TipError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl TipSource for GeminiTips {
    async fn tip(&self, stage_name: &str) -> Result<String, TipError> {
        let Some(key) = &self.config.api_key else {
            return Err(TipError::NotConfigured);
        };

        let body = json!({
            "contents": [ { "parts": [ { "text": prompt(stage_name) } ] } ]
        });

        info!(model = %self.config.model, stage = stage_name, "requesting tip");
        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", key)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TipError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = resp.json().await?;
        extract_text(parsed)
    }
}

fn prompt(stage_name: &str) -> String {
    format!(
        "Aja como um 'advogado digital' amigável para um cidadão comum no Brasil, sem usar jargão jurídico. \
         O processo dele está na fase de '{stage_name}'. \
         Forneça uma dica curta, tranquilizadora e prática sobre o que esperar ou como se preparar. \
         A dica deve ter no máximo 3 frases. Responda em português do Brasil."
    )
}

fn extract_text(response: GenerateResponse) -> Result<String, TipError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .map(|c| c.content.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();
    let text = text.trim();
    if text.is_empty() {
        return Err(TipError::Empty);
    }
    Ok(text.to_string())
}
