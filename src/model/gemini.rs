use super::{GenerationParams, LlmBackend};
use crate::error::{GenerationError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-lite";

#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl GenerateContentResponse {
    /// Text parts of the first candidate, joined. `None` when there is nothing to show.
    fn into_text(self) -> Option<String> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            debug!(%reason, "prompt blocked by provider");
        }
        let candidate = self.candidates.into_iter().next()?;
        if let Some(reason) = &candidate.finish_reason {
            debug!(%reason, "candidate finished");
        }
        let text: String = candidate
            .content?
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

fn error_message(body: &[u8]) -> String {
    match serde_json::from_slice::<ErrorEnvelope>(body) {
        Ok(env) if !env.error.message.is_empty() => env.error.message,
        _ => String::from_utf8_lossy(body).trim().to_string(),
    }
}

struct Inner {
    client: Client,
    config: GeminiConfig,
    url: String,
}

/// Google Gemini `generateContent` over REST.
#[derive(Clone)]
pub struct GeminiBackend {
    inner: Arc<Inner>,
}

impl GeminiBackend {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("latent-jokes/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;

        let model = config.model.trim_start_matches("models/");
        let url = format!("{}/v1beta/models/{}:generateContent", config.base_url, model);

        Ok(Self {
            inner: Arc::new(Inner { client, config: config.clone(), url }),
        })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.inner.config
    }

    pub fn endpoint(&self) -> &str {
        &self.inner.url
    }
}

#[async_trait::async_trait]
impl LlmBackend for GeminiBackend {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<Option<String>> {
        let request = GenerateContentRequest {
            contents: vec![Content { parts: vec![Part { text: prompt }] }],
            generation_config: GenerationConfig {
                temperature: params.temperature,
                top_p: params.top_p,
                max_output_tokens: params.max_output_tokens,
            },
        };

        debug!(url = %self.inner.url, "sending generateContent request");

        let response = self
            .inner
            .client
            .post(&self.inner.url)
            .header("x-goog-api-key", &self.inner.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::transport(e, self.inner.config.timeout))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| GenerationError::transport(e, self.inner.config.timeout))?;
        if !status.is_success() {
            return Err(GenerationError::Api { status, message: error_message(&body) });
        }

        let parsed: GenerateContentResponse = serde_json::from_slice(&body)?;
        Ok(parsed.into_text())
    }
}
