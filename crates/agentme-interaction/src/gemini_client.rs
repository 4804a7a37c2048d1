//! GeminiClient - Direct REST client for the Gemini `generateContent` API.
//!
//! One call is one POST. There is no retry and no streaming; the only
//! safeguards are a request timeout and an optional cancellation token.

use agentme_core::chat::{ChatClient, compose_request_text};
use agentme_core::config::GeminiSettings;
use agentme_core::error::{AgentMeError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

const TEMPERATURE: f64 = 0.7;
const TOP_K: u32 = 40;
const TOP_P: f64 = 0.95;
const SAFETY_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";
const SAFETY_CATEGORIES: [&str; 2] = ["HARM_CATEGORY_HARASSMENT", "HARM_CATEGORY_HATE_SPEECH"];

/// Client that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    settings: GeminiSettings,
}

impl GeminiClient {
    /// Creates a new client with the provided API key and settings.
    pub fn new(api_key: impl Into<String>, settings: GeminiSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| AgentMeError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            settings,
        })
    }

    pub fn settings(&self) -> &GeminiSettings {
        &self.settings
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{model}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            model = self.settings.model
        )
    }

    fn build_request(&self, text: String) -> GenerateContentRequest {
        let safety_settings = if self.settings.safety_settings {
            SAFETY_CATEGORIES
                .iter()
                .map(|category| SafetySetting {
                    category: category.to_string(),
                    threshold: SAFETY_THRESHOLD.to_string(),
                })
                .collect()
        } else {
            Vec::new()
        };

        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_k: TOP_K,
                top_p: TOP_P,
                max_output_tokens: self.settings.max_output_tokens,
            },
            safety_settings,
        }
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<String> {
        // The key travels in the query string; never log this URL.
        let url = format!("{}?key={}", self.endpoint(), self.api_key);

        tracing::debug!(
            endpoint = %self.endpoint(),
            max_output_tokens = body.generation_config.max_output_tokens,
            "Sending Gemini request"
        );

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| map_transport_error(err, &self.settings))?;

        let status = response.status();
        let body_text = response
            .text()
            .await
            .map_err(|err| map_transport_error(err, &self.settings))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Gemini API returned an error status");
            return Err(map_http_error(status, &body_text));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body_text).map_err(|err| {
            AgentMeError::malformed(format!("Failed to parse Gemini response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl ChatClient for GeminiClient {
    async fn send_with_cancel(
        &self,
        message: &str,
        system_prompt: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let request = self.build_request(compose_request_text(message, system_prompt));

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("Gemini request cancelled");
                Err(AgentMeError::Cancelled)
            }
            result = self.send_request(&request) => result,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    safety_settings: Vec<SafetySetting>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_k: u32,
    top_p: f64,
    max_output_tokens: u32,
}

#[derive(Serialize)]
struct SafetySetting {
    category: String,
    threshold: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Pulls `candidates[0].content.parts[0].text` out of the response.
fn extract_text_response(response: GenerateContentResponse) -> Result<String> {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .ok_or_else(|| {
            AgentMeError::malformed("Gemini API returned no text in candidates[0].content.parts[0]")
        })
}

fn map_http_error(status: StatusCode, body: &str) -> AgentMeError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .ok()
        .and_then(|wrapper| wrapper.error.message);

    AgentMeError::remote(status.as_u16(), message)
}

fn map_transport_error(err: reqwest::Error, settings: &GeminiSettings) -> AgentMeError {
    // reqwest errors carry the URL, which carries the key
    let err = err.without_url();
    if err.is_timeout() {
        AgentMeError::transport(format!(
            "Gemini API did not respond within {} seconds",
            settings.timeout_secs
        ))
    } else {
        AgentMeError::transport(format!("Gemini API request failed: {err}"))
    }
}
