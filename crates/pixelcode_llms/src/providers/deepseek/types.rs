//! DeepSeek-specific types

use serde::{Deserialize, Serialize};

/// Configuration for the DeepSeek provider
#[derive(Debug, Clone)]
pub struct DeepSeekConfig {
    /// Bearer token
    pub api_key: String,
    /// Base URL (default: https://api.deepseek.com/v1)
    pub base_url: String,
}

impl DeepSeekConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.deepseek.com/v1";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub(crate) fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[derive(Debug, Serialize)]
pub struct DeepSeekRequest {
    pub model: &'static str,
    pub messages: Vec<DeepSeekMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub stream: bool,
}

/// Flattened `{role, content}` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeepSeekMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct DeepSeekStreamChunk {
    #[serde(default)]
    pub choices: Vec<DeepSeekStreamChoice>,
    pub usage: Option<DeepSeekUsage>,
}

#[derive(Debug, Deserialize)]
pub struct DeepSeekStreamChoice {
    #[serde(default)]
    pub delta: DeepSeekDelta,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeepSeekDelta {
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DeepSeekUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}
