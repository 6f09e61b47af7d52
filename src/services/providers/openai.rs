/// OpenAI chat-completions backend
use crate::{
    error::{AppError, AppResult},
    services::providers::GenerativeBackend,
};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

#[derive(Clone)]
pub struct OpenAiBackend {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiBackend {
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            model,
        }
    }

    fn build_request<'a>(&'a self, prompt: &'a str) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        }
    }

    /// Pulls the reply text out of the first choice
    fn extract_content(response: ChatCompletionResponse) -> AppResult<String> {
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| AppError::Backend("OpenAI reply contained no content".to_string()))
    }
}

#[async_trait::async_trait]
impl GenerativeBackend for OpenAiBackend {
    async fn complete(&self, prompt: &str) -> AppResult<String> {
        let url = format!("{}/chat/completions", self.api_url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("OpenAI request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Backend(format!(
                "OpenAI API returned status {}: {}",
                status, body
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::Backend(format!("Failed to decode OpenAI response: {}", e)))?;

        let content = Self::extract_content(completion)?;

        tracing::info!(
            model = %self.model,
            reply_len = content.len(),
            provider = "openai",
            "Completion received"
        );

        Ok(content)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
