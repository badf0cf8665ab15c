use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::config::GenerationConfig;

/// Turns a contract prompt into raw text that should be JSON.
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    response_format: serde_json::Value,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible chat completions endpoint.
pub struct OpenAiGateway {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl OpenAiGateway {
    pub fn new(config: &GenerationConfig, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()
            .context("build generation http client")?;
        Ok(Self {
            client,
            endpoint: format!(
                "{}/chat/completions",
                config.base_url.trim_end_matches('/')
            ),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }
}

/// Only the first choice counts; a missing choice or null content is a failure.
fn first_content(completion: ChatCompletionResponse) -> anyhow::Result<String> {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .context("generation response has no content")
}

#[async_trait]
impl GenerationGateway for OpenAiGateway {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            response_format: json!({ "type": "json_object" }),
        };

        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("generation request")?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            anyhow::bail!("generation service returned {status}: {text}");
        }

        let completion: ChatCompletionResponse = res
            .json()
            .await
            .context("decode generation response")?;
        let content = first_content(completion)?;

        debug!(model = %self.model, chars = content.len(), "generation completed");
        Ok(content)
    }
}
