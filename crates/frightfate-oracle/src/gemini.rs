//! Gemini `generateContent` adapter.

use async_trait::async_trait;
use frightfate_core::oracle::{
    GenerationParams, NarrativeOracle, OracleError, OracleRequest, PromptRole,
};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Public Gemini API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used unless configured otherwise.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Gemini provider.
#[derive(Clone)]
pub struct GeminiOracle {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl std::fmt::Debug for GeminiOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiOracle")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiOracle {
    /// Creates a provider for the default model.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_owned(),
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    /// The model in use.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn build_headers(&self) -> Result<HeaderMap, OracleError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| OracleError::Unavailable(format!("invalid API key: {e}")))?,
        );
        Ok(headers)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<ApiContent>,
    contents: Vec<ApiContent>,
    generation_config: ApiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<ApiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiGenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
    thinking_config: ApiThinkingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<ApiCandidate>,
}

#[derive(Debug, Deserialize)]
struct ApiCandidate {
    content: Option<ApiContent>,
}

fn text_part(text: &str) -> ApiPart {
    ApiPart {
        text: Some(text.to_owned()),
    }
}

fn generation_config(params: GenerationParams) -> ApiGenerationConfig {
    ApiGenerationConfig {
        temperature: params.temperature,
        top_p: params.top_p,
        top_k: params.top_k,
        max_output_tokens: params.max_output_tokens,
        thinking_config: ApiThinkingConfig { thinking_budget: 0 },
    }
}

/// System messages become the system instruction; everything else is a
/// user turn.
fn to_api_request(request: &OracleRequest) -> ApiRequest {
    let system: Vec<ApiPart> = request
        .messages
        .iter()
        .filter(|m| m.role == PromptRole::System)
        .map(|m| text_part(&m.content))
        .collect();
    let contents = request
        .messages
        .iter()
        .filter(|m| m.role == PromptRole::User)
        .map(|m| ApiContent {
            role: Some("user".to_owned()),
            parts: vec![text_part(&m.content)],
        })
        .collect();

    ApiRequest {
        system_instruction: (!system.is_empty()).then_some(ApiContent {
            role: None,
            parts: system,
        }),
        contents,
        generation_config: generation_config(request.params),
    }
}

/// Concatenated text of the first candidate.
fn first_candidate_text(response: ApiResponse) -> Result<String, OracleError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect()
        })
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(OracleError::MalformedOutput(
            "response has no candidate text".to_owned(),
        ));
    }
    Ok(text)
}

#[async_trait]
impl NarrativeOracle for GeminiOracle {
    async fn generate(&self, request: &OracleRequest) -> Result<String, OracleError> {
        let response = self
            .client
            .post(self.endpoint())
            .headers(self.build_headers()?)
            .json(&to_api_request(request))
            .send()
            .await
            .map_err(|e| OracleError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::Unavailable(format!(
                "API error (status {status}): {body}"
            )));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| OracleError::MalformedOutput(e.to_string()))?;
        let text = first_candidate_text(api_response)?;
        debug!(model = %self.model, chars = text.len(), "oracle responded");
        Ok(text)
    }
}
