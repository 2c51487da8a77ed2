//! Client for a local Ollama-compatible text-generation service

use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::InferenceError;

/// Parameters of one generation call
#[derive(Debug, Clone, PartialEq)]
pub struct TextRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub system_prompt: Option<&'a str>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl<'a> TextRequest<'a> {
    pub fn new(model: &'a str, prompt: &'a str) -> Self {
        Self {
            model,
            prompt,
            system_prompt: None,
            max_tokens: 2000,
            temperature: 0.7,
        }
    }

    pub fn system(mut self, system_prompt: &'a str) -> Self {
        self.system_prompt = Some(system_prompt);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Trait that all text-generation backends must implement
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Whether the service is reachable. Never errors.
    async fn check_connection(&self) -> bool;

    async fn generate_text(&self, request: &TextRequest<'_>) -> Result<String, InferenceError>;

    /// Names of the models the service has installed
    async fn list_models(&self) -> Result<Vec<String>, InferenceError> {
        Ok(Vec::new())
    }
}

// Ollama API request
#[derive(Debug, Serialize)]
struct GenerateBody<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    num_predict: u32,
    temperature: f32,
}

// Ollama API response
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

pub struct OllamaClient {
    client: Client,
    base_url: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, InferenceError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_tags(&self) -> Result<Vec<String>, InferenceError> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::Malformed(e.to_string()))?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn check_connection(&self) -> bool {
        match self.fetch_tags().await {
            Ok(models) => {
                info!("Connected to Ollama. Available models: {:?}", models);
                true
            }
            Err(e) => {
                error!("Failed to connect to Ollama: {}", e);
                false
            }
        }
    }

    async fn generate_text(&self, request: &TextRequest<'_>) -> Result<String, InferenceError> {
        let body = GenerateBody {
            model: request.model,
            prompt: request.prompt,
            stream: false,
            options: GenerateOptions {
                num_predict: request.max_tokens,
                temperature: request.temperature,
            },
            system: request.system_prompt.filter(|s| !s.is_empty()),
        };

        debug!(
            "Generating with {} (num_predict={}, temperature={})",
            request.model, request.max_tokens, request.temperature
        );

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to generate text with Ollama: {}", e);
                InferenceError::Transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Ollama API error: {} - {}", status, body);
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::Malformed(e.to_string()))?;
        Ok(parsed.response)
    }

    async fn list_models(&self) -> Result<Vec<String>, InferenceError> {
        self.fetch_tags().await
    }
}
