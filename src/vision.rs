//! # Vision API Client
//!
//! Sends a JPEG to an OpenAI-compatible chat completions endpoint together
//! with the instruction prompt and returns the first choice's text.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::VisionConfig;
use crate::errors::VisionError;

/// Anything that can turn a JPEG into an answer
#[async_trait]
pub trait VisionModel: Send + Sync {
    async fn describe(&self, jpeg: Vec<u8>) -> Result<String, VisionError>;
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: Vec<ContentPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

/// Encode JPEG bytes as a `data:` URL
pub fn jpeg_data_url(jpeg: &[u8]) -> String {
    format!("data:image/jpeg;base64,{}", BASE64.encode(jpeg))
}

/// Build the request body for one image
pub fn build_request<'a>(config: &'a VisionConfig, data_url: String) -> ChatCompletionRequest<'a> {
    ChatCompletionRequest {
        model: &config.model,
        messages: vec![ChatMessage {
            role: "user",
            content: vec![
                ContentPart::Text {
                    text: &config.prompt,
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl { url: data_url },
                },
            ],
        }],
        max_tokens: config.max_tokens,
    }
}

/// Pull `choices[0].message.content` out of a raw response body
pub fn extract_answer(body: &str) -> Result<String, VisionError> {
    let response: ChatCompletionResponse = serde_json::from_str(body)?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| VisionError::MalformedResponse("response has no choices".to_string()))?;

    choice
        .message
        .content
        .ok_or_else(|| VisionError::MalformedResponse("first choice has no content".to_string()))
}

#[derive(Debug, Clone)]
pub struct OpenAiVisionClient {
    api_key: String,
    config: VisionConfig,
    http: reqwest::Client,
}

impl OpenAiVisionClient {
    pub fn new(api_key: impl Into<String>, config: VisionConfig) -> Result<Self, VisionError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            api_key: api_key.into(),
            config,
            http,
        })
    }
}

#[async_trait]
impl VisionModel for OpenAiVisionClient {
    async fn describe(&self, jpeg: Vec<u8>) -> Result<String, VisionError> {
        let request = build_request(&self.config, jpeg_data_url(&jpeg));

        debug!(
            model = %self.config.model,
            image_bytes = jpeg.len(),
            "Sending vision request"
        );

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(VisionError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let answer = extract_answer(&body)?;
        info!(answer_chars = answer.chars().count(), "Vision request completed");
        Ok(answer)
    }
}
