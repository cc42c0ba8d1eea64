//! pixelcode_llms: streaming code-generation completions across LLM providers.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │            Orchestrator  /  Refiner                  │
//! │   model → provider (built per call), timing, logs    │
//! │                       │                              │
//! │     ┌─────────┬───────┼────────┬──────────┐          │
//! │     ▼         ▼       ▼        ▼          ▼          │
//! │  OpenAI  Anthropic  Gemini  DeepSeek     Mock        │
//! │     └─────────┴───────┬────────┴──────────┘          │
//! │                       ▼                              │
//! │        TextStream ──forward──▶ ChunkSink             │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pixelcode_llms::{Conversation, Credentials, Model, Orchestrator};
//!
//! # async fn run() -> pixelcode_llms::Result<()> {
//! let conversation = Conversation::new("You are an expert Tailwind developer")
//!     .with_user("Build a login page");
//! let mut chunks: Vec<String> = Vec::new();
//! let completion = Orchestrator::new()
//!     .complete(
//!         Model::Gpt4o20241120,
//!         &conversation,
//!         &Credentials::new("sk-..."),
//!         &mut chunks,
//!     )
//!     .await?;
//! println!("{:.1}s: {}", completion.duration_secs(), completion.text());
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod error;
pub mod image;
pub mod model;
pub mod orchestrator;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod refine;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export core abstractions
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, ErrorKind, Result};
pub use model::{Model, ModelParams, ProviderFamily, TokenLimit, TokenLimitField};
pub use orchestrator::Orchestrator;
pub use provider::{Credentials, DEFAULT_TIMEOUT, Exchange, Provider};
pub use refine::{RefineOptions, Refiner};

// Re-export provider implementations
pub use providers::{
    AnthropicProvider, DeepSeekProvider, GeminiProvider, MockProvider, OpenAIProvider,
};

// Re-export commonly used types
pub use types::{
    ChunkSink, Completion, Content, ContentPart, Conversation, FnSink, ImageUrl, NullSink, Role,
    StreamEvent, TextStream, Turn, Usage,
};
