use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ChatProvider, ChatTurn, TurnRole};
use crate::config::Config;

/// Клиент для Google Gemini generateContent API
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl GeminiClient {
    /// Создает клиент из уже загруженной конфигурации
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("не удалось создать HTTP клиент")?;

        Ok(Self {
            http,
            api_key: config.gemini_api_key.clone(),
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            model: config.gemini_model.clone(),
            temperature: config.gemini_temperature,
            max_tokens: config.gemini_max_tokens,
        })
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Тело запроса: у Gemini роли называются "user" и "model"
    pub fn build_request(&self, turns: &[ChatTurn]) -> GenerateRequest {
        let contents = turns
            .iter()
            .map(|turn| Content {
                role: match turn.role {
                    TurnRole::User => "user".to_string(),
                    TurnRole::Model => "model".to_string(),
                },
                parts: vec![Part {
                    text: turn.text.clone(),
                }],
            })
            .collect();

        GenerateRequest {
            contents,
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_tokens,
            },
        }
    }
}

/// Склеивает текстовые части первого кандидата
pub fn extract_text(response: &GenerateResponse) -> Result<String> {
    let candidate = response
        .candidates
        .first()
        .ok_or_else(|| anyhow!("No response from Gemini"))?;

    let text: String = candidate
        .content
        .as_ref()
        .map(|content| content.parts.iter().map(|p| p.text.as_str()).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        bail!(
            "Gemini returned no text (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        );
    }

    Ok(text)
}

#[async_trait]
impl ChatProvider for GeminiClient {
    async fn send(&self, turns: &[ChatTurn]) -> Result<String> {
        if !self.is_configured() {
            bail!("Gemini API key is not configured (GEMINI_API_KEY)");
        }

        let request = self.build_request(turns);
        log::debug!("📡 Запрос к Gemini ({}), реплик: {}", self.model, turns.len());

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Gemini API")?;

        let status = response.status();
        let text = response
            .text()
            .await
            .context("Failed to read Gemini API response")?;

        if !status.is_success() {
            bail!("Gemini API error: {} - {}", status, text);
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&text).context("Failed to parse Gemini API response")?;

        extract_text(&parsed)
    }

    fn name(&self) -> &str {
        "Gemini"
    }
}
