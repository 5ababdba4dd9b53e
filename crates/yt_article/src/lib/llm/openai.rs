use reqwest::Client;
use serde::Deserialize;

use crate::llm::generator::TextGenerator;

#[derive(Debug, Clone)]
pub struct OpenAIClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Debug, thiserror::Error)]
pub enum OpenAIError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("No content in completion response")]
    EmptyResponse,
}

impl OpenAIClient {
    const SYSTEM_PROMPT: &'static str = include_str!("./prompts/system_0.txt");
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";
    pub const DEFAULT_MODEL: &'static str = "gpt-4o-mini";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.into(),
            model: Self::DEFAULT_MODEL.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub async fn send_completion_request(
        &self,
        user_content: impl Into<String>,
    ) -> Result<CompletionResponse, OpenAIError> {
        let body = serde_json::json!({
            "model": &self.model,
            "messages": [
                {
                    "role": "system",
                    "content": Self::SYSTEM_PROMPT
                },
                {
                    "role": "user",
                    "content": user_content.into()
                }
            ]
        });

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(OpenAIError::Api { status, message });
        }

        Ok(resp.json::<CompletionResponse>().await?)
    }
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub index: u32,
    pub message: CompletionMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    pub role: String,
    pub content: Option<String>,
}

impl CompletionResponse {
    /// Content of the first choice, if any
    pub fn into_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
    }
}

impl TextGenerator for OpenAIClient {
    type Error = OpenAIError;

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        let response = self
            .send_completion_request(prompt)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to complete prompt"))?;

        if let Some(choice) = response.choices.first() {
            if choice.finish_reason.as_deref() == Some("length") {
                tracing::warn!(model = %self.model, "Completion was cut off at the token limit");
            }
        }

        response.into_content().ok_or(OpenAIError::EmptyResponse)
    }
}
