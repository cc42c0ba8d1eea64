//! Model identifiers and the per-model request parameter table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Backend family that serves a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderFamily {
    OpenAI,
    Anthropic,
    Gemini,
    DeepSeek,
}

impl ProviderFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderFamily::OpenAI => "openai",
            ProviderFamily::Anthropic => "anthropic",
            ProviderFamily::Gemini => "gemini",
            ProviderFamily::DeepSeek => "deepseek",
        }
    }
}

impl fmt::Display for ProviderFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Model versions passed to the providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Model {
    #[serde(rename = "gpt-4-vision-preview")]
    Gpt4Vision,
    #[serde(rename = "gpt-4-turbo-2024-04-09")]
    Gpt4Turbo20240409,
    #[serde(rename = "gpt-4o-2024-05-13")]
    Gpt4o20240513,
    #[serde(rename = "gpt-4o-2024-08-06")]
    Gpt4o20240806,
    #[serde(rename = "gpt-4o-2024-11-20")]
    Gpt4o20241120,
    #[serde(rename = "o1-2024-12-17")]
    O120241217,
    #[serde(rename = "claude-3-sonnet-20240229")]
    Claude3Sonnet,
    #[serde(rename = "claude-3-opus-20240229")]
    Claude3Opus,
    #[serde(rename = "claude-3-haiku-20240307")]
    Claude3Haiku,
    #[serde(rename = "claude-3-5-sonnet-20240620")]
    Claude35Sonnet20240620,
    #[serde(rename = "claude-3-5-sonnet-20241022")]
    Claude35Sonnet20241022,
    #[serde(rename = "gemini-2.0-flash-exp")]
    Gemini20FlashExp,
    #[serde(rename = "deepseek-coder")]
    DeepSeekCoder,
}

/// Name of the request field that carries the output token limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenLimitField {
    MaxTokens,
    MaxCompletionTokens,
    MaxOutputTokens,
}

impl TokenLimitField {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenLimitField::MaxTokens => "max_tokens",
            TokenLimitField::MaxCompletionTokens => "max_completion_tokens",
            TokenLimitField::MaxOutputTokens => "maxOutputTokens",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLimit {
    pub field: TokenLimitField,
    pub value: u32,
}

impl TokenLimit {
    const fn max_tokens(value: u32) -> Self {
        Self {
            field: TokenLimitField::MaxTokens,
            value,
        }
    }
}

/// Request parameters for one model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelParams {
    pub supports_streaming: bool,
    /// `None` means the field is omitted from the request
    pub temperature: Option<f32>,
    pub token_limit: Option<TokenLimit>,
}

impl ModelParams {
    const fn streaming(token_limit: Option<TokenLimit>) -> Self {
        Self {
            supports_streaming: true,
            temperature: Some(0.0),
            token_limit,
        }
    }
}

impl Model {
    pub const ALL: [Model; 13] = [
        Model::Gpt4Vision,
        Model::Gpt4Turbo20240409,
        Model::Gpt4o20240513,
        Model::Gpt4o20240806,
        Model::Gpt4o20241120,
        Model::O120241217,
        Model::Claude3Sonnet,
        Model::Claude3Opus,
        Model::Claude3Haiku,
        Model::Claude35Sonnet20240620,
        Model::Claude35Sonnet20241022,
        Model::Gemini20FlashExp,
        Model::DeepSeekCoder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Model::Gpt4Vision => "gpt-4-vision-preview",
            Model::Gpt4Turbo20240409 => "gpt-4-turbo-2024-04-09",
            Model::Gpt4o20240513 => "gpt-4o-2024-05-13",
            Model::Gpt4o20240806 => "gpt-4o-2024-08-06",
            Model::Gpt4o20241120 => "gpt-4o-2024-11-20",
            Model::O120241217 => "o1-2024-12-17",
            Model::Claude3Sonnet => "claude-3-sonnet-20240229",
            Model::Claude3Opus => "claude-3-opus-20240229",
            Model::Claude3Haiku => "claude-3-haiku-20240307",
            Model::Claude35Sonnet20240620 => "claude-3-5-sonnet-20240620",
            Model::Claude35Sonnet20241022 => "claude-3-5-sonnet-20241022",
            Model::Gemini20FlashExp => "gemini-2.0-flash-exp",
            Model::DeepSeekCoder => "deepseek-coder",
        }
    }

    pub fn family(&self) -> ProviderFamily {
        match self {
            Model::Gpt4Vision
            | Model::Gpt4Turbo20240409
            | Model::Gpt4o20240513
            | Model::Gpt4o20240806
            | Model::Gpt4o20241120
            | Model::O120241217 => ProviderFamily::OpenAI,
            Model::Claude3Sonnet
            | Model::Claude3Opus
            | Model::Claude3Haiku
            | Model::Claude35Sonnet20240620
            | Model::Claude35Sonnet20241022 => ProviderFamily::Anthropic,
            Model::Gemini20FlashExp => ProviderFamily::Gemini,
            Model::DeepSeekCoder => ProviderFamily::DeepSeek,
        }
    }

    /// Request parameters for this model.
    pub fn params(&self) -> ModelParams {
        match self {
            Model::Gpt4Vision | Model::Gpt4Turbo20240409 | Model::Gpt4o20240806 => {
                ModelParams::streaming(None)
            }
            Model::Gpt4o20240513 => ModelParams::streaming(Some(TokenLimit::max_tokens(4096))),
            Model::Gpt4o20241120 => ModelParams::streaming(Some(TokenLimit::max_tokens(16384))),
            // Reasoning model: no streaming, no temperature
            Model::O120241217 => ModelParams {
                supports_streaming: false,
                temperature: None,
                token_limit: Some(TokenLimit {
                    field: TokenLimitField::MaxCompletionTokens,
                    value: 20000,
                }),
            },
            Model::Claude3Sonnet
            | Model::Claude3Opus
            | Model::Claude3Haiku
            | Model::Claude35Sonnet20240620
            | Model::Claude35Sonnet20241022 => {
                ModelParams::streaming(Some(TokenLimit::max_tokens(8192)))
            }
            Model::Gemini20FlashExp => ModelParams::streaming(Some(TokenLimit {
                field: TokenLimitField::MaxOutputTokens,
                value: 8192,
            })),
            Model::DeepSeekCoder => ModelParams::streaming(Some(TokenLimit::max_tokens(4096))),
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Model {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Model::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s.trim())
            .ok_or_else(|| Error::invalid_input(format!("unknown model: {}", s)))
    }
}
